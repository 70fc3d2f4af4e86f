//! Form schemas.
//!
//! Each `validate_*` function takes the raw strings a form posted and either
//! returns a cleaned value ready to send to the backend, or the per-field
//! messages to show next to the inputs. Nothing is sent anywhere when
//! validation fails.

use std::collections::BTreeMap;

use crate::types::{Email, Price};

/// Largest accepted menu item image (2 MiB).
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Image content types the backend accepts.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

const MAX_ITEM_NAME_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_CATEGORY_NAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 6;

/// Field name to message, one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field. The first message for a field is kept.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// Size and declared type of an uploaded image.
#[derive(Debug, Clone, Copy)]
pub struct ImageCheck<'a> {
    pub size: usize,
    pub content_type: &'a str,
}

/// Raw menu item form fields.
#[derive(Debug, Clone, Default)]
pub struct MenuItemInput {
    pub name: String,
    pub price: String,
    pub category: String,
    pub description: String,
}

/// A menu item form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemDraft {
    pub name: String,
    pub price: Price,
    /// Category name, the key the backend resolves.
    pub category: String,
    pub description: String,
}

/// Validate the add/edit menu item form.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_menu_item(
    input: &MenuItemInput,
    image: Option<ImageCheck<'_>>,
) -> Result<MenuItemDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.add("name", "Name is required");
    } else if name.chars().count() > MAX_ITEM_NAME_CHARS {
        errors.add("name", "Name must be less than 100 characters");
    }

    let price = match Price::parse_positive(&input.price) {
        Ok(price) => Some(price),
        Err(err) => {
            errors.add("price", err.to_string());
            None
        }
    };

    let category = input.category.trim();
    if category.is_empty() {
        errors.add("category", "Category is required");
    }

    let description = input.description.trim();
    if description.is_empty() {
        errors.add("description", "Description is required");
    } else if description.chars().count() > MAX_DESCRIPTION_CHARS {
        errors.add("description", "Description must be less than 500 characters");
    }

    if let Some(image) = image
        && let Err(message) = validate_image(image)
    {
        errors.add("image", message);
    }

    match price {
        Some(price) => errors.into_result(|| MenuItemDraft {
            name: name.to_string(),
            price,
            category: category.to_string(),
            description: description.to_string(),
        }),
        None => Err(errors),
    }
}

/// Check an upload against the size and type limits.
///
/// # Errors
///
/// Returns the message to show under the image field.
pub fn validate_image(image: ImageCheck<'_>) -> Result<(), &'static str> {
    if image.size > MAX_IMAGE_BYTES {
        return Err("Image size must be maximum 2MB");
    }
    let content_type = image.content_type.trim().to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err("Only PNG and JPEG formats are supported");
    }
    Ok(())
}

/// Validate the add category form, returning the trimmed name.
///
/// # Errors
///
/// Returns the `name` field message.
pub fn validate_category(name: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = name.trim();
    if name.is_empty() {
        errors.add("name", "Name is required");
    } else if name.chars().count() > MAX_CATEGORY_NAME_CHARS {
        errors.add("name", "Name must be less than 50 characters");
    }
    errors.into_result(|| name.to_string())
}

/// Sign-in form that passed validation.
#[derive(Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Validate the sign-in form.
///
/// The password is passed through untouched; only its presence is checked.
///
/// # Errors
///
/// Returns the failing `email` and `password` fields.
pub fn validate_login(email: &str, password: &str) -> Result<Credentials, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let parsed = Email::parse(email)
        .map_err(|err| errors.add("email", err.to_string()))
        .ok();
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    match parsed {
        Some(email) => errors.into_result(|| Credentials {
            email,
            password: password.to_string(),
        }),
        None => Err(errors),
    }
}

/// Raw registration form fields.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

/// Registration form that passed validation.
#[derive(Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: Email,
    pub address: String,
    pub password: String,
}

/// Validate the registration form.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate_registration(input: &RegistrationInput) -> Result<Registration, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let full_name = input.full_name.trim();
    if full_name.is_empty() {
        errors.add("fullName", "Full name is required");
    }
    let parsed = Email::parse(&input.email)
        .map_err(|err| errors.add("email", err.to_string()))
        .ok();
    let address = input.address.trim();
    if address.is_empty() {
        errors.add("address", "Address is required");
    }
    if input.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.add("password", "Password must be at least 6 characters");
    }

    match parsed {
        Some(email) => errors.into_result(|| Registration {
            full_name: full_name.to_string(),
            email,
            address: address.to_string(),
            password: input.password.clone(),
        }),
        None => Err(errors),
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("address", &self.address)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
