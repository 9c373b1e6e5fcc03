// src/common/validation.rs

use validator::ValidationError;

// Recusa textos vazios ou só com espaços; `length(min = 1)` aceita "   ".
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O campo não pode ficar em branco.".into());
        return Err(err);
    }
    Ok(())
}
