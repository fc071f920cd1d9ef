pub mod code_generator;
pub mod email;
pub mod jwt;
pub mod password;
pub mod upload;

pub use code_generator::{generate_claim_code, generate_reset_code};
pub use email::validate_email;
pub use jwt::*;
pub use password::*;
pub use upload::{delete_image_file, save_book_images};
