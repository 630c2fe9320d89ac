//! Form input and presence checks.
//!
//! Each form validates its fields in display order and stops at the first
//! failure, so the screen shows one message at a time.

use crate::auth::SignUp;
use crate::domain::{Category, FormField, ValidationError};
use crate::storage::NewListing;
use serde::{Deserialize, Serialize};

/// Most photos a single listing can carry.
pub const MAX_IMAGES: usize = 5;

fn require(value: &str, field: FormField) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// [`ValidationError::Missing`] for the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.email, FormField::Email)?;
        require(&self.password, FormField::Password)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
}

impl SignUpForm {
    /// Checks presence of name, email, password and confirmation, then that
    /// the two passwords agree. Phone is optional.
    ///
    /// # Errors
    ///
    /// The first failing check as a [`ValidationError`].
    pub fn validate(&self) -> Result<SignUp, ValidationError> {
        require(&self.name, FormField::Name)?;
        require(&self.email, FormField::Email)?;
        require(&self.password, FormField::Password)?;
        require(&self.confirm_password, FormField::PasswordConfirmation)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        let phone = self.phone.trim();
        Ok(SignUp {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        })
    }
}

/// Raw input from the "add animal" screen.
///
/// `age` is the typed text, in months.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListingForm {
    pub name: String,
    pub age: String,
    pub category: String,
    pub description: String,
    pub images: Vec<String>,
}

impl NewListingForm {
    /// Validates the form into a submission ready for storage.
    ///
    /// # Errors
    ///
    /// The first failing check, in field order: name, age, category,
    /// description, photos.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelter::app::forms::NewListingForm;
    /// use shelter::domain::{FormField, ValidationError};
    ///
    /// let form = NewListingForm { name: "Rex".into(), ..Default::default() };
    /// assert_eq!(form.validate(), Err(ValidationError::Missing(FormField::Age)));
    /// ```
    pub fn validate(&self) -> Result<NewListing, ValidationError> {
        require(&self.name, FormField::Name)?;

        require(&self.age, FormField::Age)?;
        let age_months: u32 = self
            .age
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidAge)?;

        require(&self.category, FormField::Category)?;
        let category: Category = self.category.parse()?;

        require(&self.description, FormField::Description)?;

        let images: Vec<String> = self
            .images
            .iter()
            .map(|uri| uri.trim())
            .filter(|uri| !uri.is_empty())
            .map(str::to_string)
            .collect();
        if images.is_empty() {
            return Err(ValidationError::Missing(FormField::Images));
        }
        if images.len() > MAX_IMAGES {
            return Err(ValidationError::TooManyImages { max: MAX_IMAGES });
        }

        Ok(NewListing {
            name: self.name.trim().to_string(),
            age_months,
            category,
            description: self.description.trim().to_string(),
            images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NewListingForm {
        NewListingForm {
            name: " Rex ".into(),
            age: "14".into(),
            category: "Dog".into(),
            description: "Loves walks".into(),
            images: vec!["a.jpg".into()],
        }
    }

    #[test]
    fn first_missing_field_is_reported_in_order() {
        let mut form = NewListingForm::default();
        let order = [
            FormField::Name,
            FormField::Age,
            FormField::Category,
            FormField::Description,
            FormField::Images,
        ];
        for field in order {
            assert_eq!(form.validate(), Err(ValidationError::Missing(field)));
            match field {
                FormField::Name => form.name = "Rex".into(),
                FormField::Age => form.age = "3".into(),
                FormField::Category => form.category = "cat".into(),
                FormField::Description => form.description = "Tiny".into(),
                _ => form.images.push("rex.jpg".into()),
            }
        }
        assert!(form.validate().is_ok());
    }

    #[test]
    fn valid_form_is_trimmed_and_parsed() {
        let listing = complete().validate().unwrap();
        assert_eq!(listing.name, "Rex");
        assert_eq!(listing.age_months, 14);
        assert_eq!(listing.category, Category::Dog);
    }

    #[test]
    fn bad_age_and_category_are_rejected() {
        let mut form = complete();
        form.age = "two".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidAge));
        form.age = "-1".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidAge));

        let mut form = complete();
        form.category = "parrot".into();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::UnknownCategory(_))
        ));
    }

    #[test]
    fn photo_limit() {
        let mut form = complete();
        form.images = (0..=MAX_IMAGES).map(|i| format!("{i}.jpg")).collect();
        assert_eq!(
            form.validate(),
            Err(ValidationError::TooManyImages { max: MAX_IMAGES })
        );
        form.images.pop();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn login_requires_email_then_password() {
        let mut form = LoginForm::default();
        assert_eq!(form.validate(), Err(ValidationError::Missing(FormField::Email)));
        form.email = "ana@example.com".into();
        assert_eq!(
            form.validate(),
            Err(ValidationError::Missing(FormField::Password))
        );
        form.password = "secret1".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn sign_up_checks_confirmation() {
        let form = SignUpForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            phone: String::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        let form = SignUpForm {
            confirm_password: "secret1".into(),
            ..form
        };
        let sign_up = form.validate().unwrap();
        assert_eq!(sign_up.phone, None);
    }
}
