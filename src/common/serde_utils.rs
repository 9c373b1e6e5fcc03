use serde::{Deserialize, Deserializer};

/// PATCH em campos anuláveis:
///
/// * campo ausente  => `None`          (não altera)
/// * campo = null   => `Some(None)`    (limpa)
/// * campo = valor  => `Some(Some(v))` (altera)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
