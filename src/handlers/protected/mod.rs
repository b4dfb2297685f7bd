// Handlers behind `jwt_auth_middleware`; each one reads `AuthUser` from the
// request extensions and scopes every call to that user.
pub mod items;
pub mod lists;
