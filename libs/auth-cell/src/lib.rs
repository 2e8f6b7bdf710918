pub mod services;

pub use services::sign_in::SignInService;
