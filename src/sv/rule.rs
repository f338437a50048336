use crate::{
  entity::{CommissionType, RuleAppliesTo, commission_rule, store_affiliate},
  prelude::*,
};

pub struct Rules<'a> {
  db: &'a DatabaseConnection,
}

/// Malformed commission values are rejected here, at creation time;
/// the resolver itself never validates.
pub fn validate_commission(ty: &CommissionType, value: i64) -> Result<()> {
  match ty {
    CommissionType::Percentage if (1..=100).contains(&value) => Ok(()),
    CommissionType::Percentage => Err(Error::InvalidCommission(format!(
      "percentage must be between 1 and 100, got {value}"
    ))),
    CommissionType::Fixed if value > 0 => Ok(()),
    CommissionType::Fixed => Err(Error::InvalidCommission(
      "fixed commission must be a positive amount".into(),
    )),
  }
}

impl<'a> Rules<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Create or replace the rule for (link, applies_to, target). A
  /// duplicate never accumulates; it overwrites the existing row.
  pub async fn set(
    &self,
    link_id: i32,
    applies_to: RuleAppliesTo,
    target: &str,
    target_name: &str,
    ty: CommissionType,
    value: i64,
  ) -> Result<commission_rule::Model> {
    validate_commission(&ty, value)?;

    if target.trim().is_empty() {
      return Err(Error::InvalidArgs("rule target must not be empty".into()));
    }

    store_affiliate::Entity::find_by_id(link_id)
      .one(self.db)
      .await?
      .ok_or(Error::LinkNotFound)?;

    let now = Utc::now().naive_utc();

    let existing = commission_rule::Entity::find()
      .filter(commission_rule::Column::StoreAffiliateId.eq(link_id))
      .filter(commission_rule::Column::AppliesTo.eq(applies_to.clone()))
      .filter(commission_rule::Column::Target.eq(target))
      .one(self.db)
      .await?;

    if let Some(rule) = existing {
      return Ok(
        commission_rule::ActiveModel {
          target_name: Set(target_name.to_string()),
          commission_type: Set(ty),
          commission_value: Set(value),
          updated_at: Set(now),
          ..rule.into()
        }
        .update(self.db)
        .await?,
      );
    }

    Ok(
      commission_rule::ActiveModel {
        id: NotSet,
        store_affiliate_id: Set(link_id),
        applies_to: Set(applies_to),
        target: Set(target.to_string()),
        target_name: Set(target_name.to_string()),
        commission_type: Set(ty),
        commission_value: Set(value),
        created_at: Set(now),
        updated_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  /// Rule snapshot for the resolver.
  pub async fn for_link(
    &self,
    link_id: i32,
  ) -> Result<Vec<commission_rule::Model>> {
    Ok(
      commission_rule::Entity::find()
        .filter(commission_rule::Column::StoreAffiliateId.eq(link_id))
        .all(self.db)
        .await?,
    )
  }

  pub async fn remove(&self, rule_id: i32) -> Result<()> {
    let rule = commission_rule::Entity::find_by_id(rule_id)
      .one(self.db)
      .await?
      .ok_or(Error::RuleNotFound)?;

    commission_rule::Entity::delete_by_id(rule.id).exec(self.db).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::{fixtures, test_db};

  #[test]
  fn rejects_malformed_values() {
    assert!(matches!(
      validate_commission(&CommissionType::Percentage, 0),
      Err(Error::InvalidCommission(_))
    ));
    assert!(matches!(
      validate_commission(&CommissionType::Percentage, 101),
      Err(Error::InvalidCommission(_))
    ));
    assert!(matches!(
      validate_commission(&CommissionType::Percentage, -5),
      Err(Error::InvalidCommission(_))
    ));
    assert!(matches!(
      validate_commission(&CommissionType::Fixed, 0),
      Err(Error::InvalidCommission(_))
    ));
    assert!(matches!(
      validate_commission(&CommissionType::Fixed, -200),
      Err(Error::InvalidCommission(_))
    ));
    assert!(validate_commission(&CommissionType::Percentage, 100).is_ok());
    assert!(validate_commission(&CommissionType::Fixed, 1).is_ok());
  }

  #[tokio::test]
  async fn duplicate_rule_replaces_in_place() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    let rules = Rules::new(&db);

    rules
      .set(
        link.id,
        RuleAppliesTo::Category,
        "Bebidas",
        "Bebidas",
        CommissionType::Percentage,
        5,
      )
      .await
      .unwrap();

    let replaced = rules
      .set(
        link.id,
        RuleAppliesTo::Category,
        "Bebidas",
        "Bebidas",
        CommissionType::Fixed,
        300,
      )
      .await
      .unwrap();

    assert_eq!(replaced.commission_type, CommissionType::Fixed);
    assert_eq!(replaced.commission_value, 300);

    let all = rules.for_link(link.id).await.unwrap();
    assert_eq!(all.len(), 1);
  }

  #[tokio::test]
  async fn rules_for_different_targets_coexist() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    let rules = Rules::new(&db);

    rules
      .set(
        link.id,
        RuleAppliesTo::Product,
        "sku-1",
        "Suco de Uva",
        CommissionType::Fixed,
        150,
      )
      .await
      .unwrap();
    rules
      .set(
        link.id,
        RuleAppliesTo::Category,
        "Bebidas",
        "Bebidas",
        CommissionType::Percentage,
        5,
      )
      .await
      .unwrap();

    assert_eq!(rules.for_link(link.id).await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn set_requires_existing_link() {
    let db = test_db::setup().await;
    let result = Rules::new(&db)
      .set(
        999,
        RuleAppliesTo::Product,
        "sku-1",
        "Produto",
        CommissionType::Percentage,
        10,
      )
      .await;

    assert!(matches!(result, Err(Error::LinkNotFound)));
  }

  #[tokio::test]
  async fn remove_unknown_rule_is_not_found() {
    let db = test_db::setup().await;
    assert!(matches!(
      Rules::new(&db).remove(42).await,
      Err(Error::RuleNotFound)
    ));
  }
}
