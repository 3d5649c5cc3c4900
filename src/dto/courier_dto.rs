use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_not_blank;

// Request para registrar un entregador
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourierRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub last_name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}
