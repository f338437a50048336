/// Centavos to "R$ 12,34" for logs and admin notes.
pub fn format_brl(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.abs();
  format!("R$ {}{},{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_centavos() {
    assert_eq!(format_brl(0), "R$ 0,00");
    assert_eq!(format_brl(5), "R$ 0,05");
    assert_eq!(format_brl(123456), "R$ 1234,56");
    assert_eq!(format_brl(-250), "R$ -2,50");
  }
}
