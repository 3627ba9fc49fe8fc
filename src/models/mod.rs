pub mod course;
pub mod enrollment;
pub mod student;

pub use course::Course;
pub use enrollment::{EnrolledCourse, Enrollment, NewEnrollmentRequest};
pub use student::{
    LoginRequest, LoginResponse, RegistrationRequest, Student, StudentDetails, StudentProfile,
};
