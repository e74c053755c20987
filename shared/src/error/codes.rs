//! Unified error codes for the blog backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Category (content taxonomy) errors
//! - 4xxx: Menu errors
//! - 5xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard frontend can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Role string is not one of AUTHOR / EDITOR / ADMIN
    UnknownRole = 2006,

    // ==================== 3xxx: Category ====================
    /// Category not found
    CategoryNotFound = 3001,
    /// Category slug already exists
    CategorySlugExists = 3002,
    /// Category still has child categories
    CategoryHasChildren = 3003,
    /// Parent would create a cycle or does not exist
    CategoryParentInvalid = 3004,

    // ==================== 4xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 4001,
    /// Menu item still has child items
    MenuItemHasChildren = 4002,
    /// Parent would create a cycle or does not exist
    MenuParentInvalid = 4003,

    // ==================== 5xxx: User ====================
    /// User not found
    UserNotFound = 5001,
    /// Username already exists
    UsernameExists = 5002,
    /// Email already exists
    EmailExists = 5003,
    /// Cannot delete own account
    CannotDeleteSelf = 5004,
    /// Password too short
    PasswordTooShort = 5005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Insufficient permissions",
            ErrorCode::UnknownRole => "Unknown role",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategorySlugExists => "Category slug already exists",
            ErrorCode::CategoryHasChildren => "Category has child categories",
            ErrorCode::CategoryParentInvalid => "Invalid parent category",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemHasChildren => "Menu item has child items",
            ErrorCode::MenuParentInvalid => "Invalid parent menu item",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::EmailExists => "Email already exists",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2006 => Ok(ErrorCode::UnknownRole),

            // Category
            3001 => Ok(ErrorCode::CategoryNotFound),
            3002 => Ok(ErrorCode::CategorySlugExists),
            3003 => Ok(ErrorCode::CategoryHasChildren),
            3004 => Ok(ErrorCode::CategoryParentInvalid),

            // Menu
            4001 => Ok(ErrorCode::MenuItemNotFound),
            4002 => Ok(ErrorCode::MenuItemHasChildren),
            4003 => Ok(ErrorCode::MenuParentInvalid),

            // User
            5001 => Ok(ErrorCode::UserNotFound),
            5002 => Ok(ErrorCode::UsernameExists),
            5003 => Ok(ErrorCode::EmailExists),
            5004 => Ok(ErrorCode::CannotDeleteSelf),
            5005 => Ok(ErrorCode::PasswordTooShort),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
