//! Wire-format request and response bodies.
//!
//! All JSON fields are camelCase. Response views ([`MemberProfile`],
//! [`AdminProfile`]) are the only account shapes that cross the API boundary;
//! hashes, codes and tokens never appear in them.

pub mod members;
pub mod users;

pub use members::{
    EmailRequest, MemberLoginRequest, MemberLoginResponse, MemberProfile, MessageResponse,
    RegisterRequest, ResetPasswordRequest, VerifyRequest, VerifyResetCodeRequest,
};
pub use users::{
    AdminLoginRequest, AdminProfile, AdminSessionResponse, ChangePasswordRequest,
    CreateUserRequest, CreateUserResponse, MeResponse, OnboardingLoginRequest, UsersListResponse,
};
