//! Form checks run before anything is sent to the portal.
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{RegistrationRequest, StudentProfile};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 3;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+@[a-zA-Z\d.-]+\.[a-zA-Z]{2,}$").expect("valid regex"));
static REGISTRATION_NIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{9}[VvXx]|\d{12})$").expect("valid regex"));
static REGISTRATION_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+94|0)?[1-9]\d{8}$").expect("valid regex"));
static PROFILE_NIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{9}[Vv]$|^\d{12}$").expect("valid regex"));
static PROFILE_PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));

/// Editable profile fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProfileField {
    Name,
    Email,
    Nic,
    PhoneNumber,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Name,
        ProfileField::Email,
        ProfileField::Nic,
        ProfileField::PhoneNumber,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Email => "Email",
            ProfileField::Nic => "NIC",
            ProfileField::PhoneNumber => "Phone Number",
        }
    }

    pub fn get(self, profile: &StudentProfile) -> &str {
        match self {
            ProfileField::Name => &profile.name,
            ProfileField::Email => &profile.email,
            ProfileField::Nic => &profile.nic,
            ProfileField::PhoneNumber => &profile.phone_number,
        }
    }

    pub fn set(self, profile: &mut StudentProfile, value: String) {
        match self {
            ProfileField::Name => profile.name = value,
            ProfileField::Email => profile.email = value,
            ProfileField::Nic => profile.nic = value,
            ProfileField::PhoneNumber => profile.phone_number = value,
        }
    }
}

pub type FieldErrors = BTreeMap<ProfileField, String>;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Registration stops at the first failing rule and reports that one message.
pub fn validate_registration(form: &RegistrationRequest) -> Result<(), String> {
    let fields = [
        &form.name,
        &form.email,
        &form.nic,
        &form.phone_number,
        &form.password,
        &form.confirm_password,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err("All fields are required.".to_string());
    }

    if form.password != form.confirm_password {
        return Err("Passwords do not match.".to_string());
    }

    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LEN
        ));
    }

    if !is_valid_email(&form.email) {
        return Err("Enter a valid email address.".to_string());
    }

    if !REGISTRATION_NIC_RE.is_match(&form.nic) {
        return Err(
            "Invalid NIC format. Use 9 digits followed by 'V' or 'X', or a 12-digit format."
                .to_string(),
        );
    }

    if !REGISTRATION_PHONE_RE.is_match(&form.phone_number) {
        return Err("Invalid phone number format.".to_string());
    }

    Ok(())
}

/// Profile edits are checked field by field; every failing field gets a message.
pub fn validate_profile(profile: &StudentProfile) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = profile.name.trim();
    if name.is_empty() || profile.name.chars().count() < MIN_NAME_LEN {
        errors.insert(
            ProfileField::Name,
            format!("Name must be at least {} characters long.", MIN_NAME_LEN),
        );
    }
    if profile.email.trim().is_empty() || !is_valid_email(&profile.email) {
        errors.insert(ProfileField::Email, "Enter a valid email address.".to_string());
    }
    if profile.nic.trim().is_empty() || !PROFILE_NIC_RE.is_match(&profile.nic) {
        errors.insert(
            ProfileField::Nic,
            "NIC must be 10 (ending with V/v) or 12 digits long.".to_string(),
        );
    }
    if profile.phone_number.trim().is_empty() || !PROFILE_PHONE_RE.is_match(&profile.phone_number)
    {
        errors.insert(
            ProfileField::PhoneNumber,
            "Phone number must be exactly 10 digits.".to_string(),
        );
    }

    errors
}

pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Email and password are required.".to_string());
    }
    if !is_valid_email(email.trim()) {
        return Err("Enter a valid email address.".to_string());
    }
    Ok(())
}
