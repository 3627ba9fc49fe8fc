use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub nic: String,
    pub phone_number: String,
}

impl Student {
    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            name: self.name.clone(),
            email: self.email.clone(),
            nic: self.nic.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    /// Copy edited profile fields over this record, keeping the id.
    pub fn apply(&mut self, profile: &StudentProfile) {
        self.name = profile.name.clone();
        self.email = profile.email.clone();
        self.nic = profile.nic.clone();
        self.phone_number = profile.phone_number.clone();
    }
}

/// Body of `GET /students/studentdetails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDetails {
    pub student: Student,
}

/// Editable part of a student record, sent by `PUT /students/update/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub email: String,
    pub nic: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub nic: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
