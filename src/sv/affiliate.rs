use crate::{
  entity::{
    AffiliateStatus, CommissionType, LinkStatus, affiliate, store,
    store_affiliate,
  },
  prelude::*,
  sv::rule::validate_commission,
};

pub struct Affiliates<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Affiliates<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn register(
    &self,
    name: &str,
    email: &str,
    pix_key: &str,
  ) -> Result<affiliate::Model> {
    if name.trim().is_empty() || email.trim().is_empty() {
      return Err(Error::InvalidArgs(
        "affiliate name and email are required".into(),
      ));
    }

    let now = Utc::now().naive_utc();
    Ok(
      affiliate::ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        pix_key: Set(pix_key.to_string()),
        status: Set(AffiliateStatus::Active),
        created_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  pub async fn by_id(&self, affiliate_id: i32) -> Result<affiliate::Model> {
    affiliate::Entity::find_by_id(affiliate_id)
      .one(self.db)
      .await?
      .ok_or(Error::AffiliateNotFound)
  }

  pub async fn set_pix_key(
    &self,
    affiliate_id: i32,
    pix_key: &str,
  ) -> Result<()> {
    let row = self.by_id(affiliate_id).await?;

    affiliate::ActiveModel { pix_key: Set(pix_key.to_string()), ..row.into() }
      .update(self.db)
      .await?;

    Ok(())
  }

  /// Soft removal; earnings and request history stay intact.
  pub async fn disable(&self, affiliate_id: i32) -> Result<()> {
    let row = self.by_id(affiliate_id).await?;

    affiliate::ActiveModel {
      status: Set(AffiliateStatus::Disabled),
      ..row.into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  /// Create the store link in `invited` state with the store's default
  /// commission for this affiliate.
  pub async fn invite(
    &self,
    store_id: i32,
    affiliate_id: i32,
    ty: CommissionType,
    value: i64,
  ) -> Result<store_affiliate::Model> {
    validate_commission(&ty, value)?;

    store::Entity::find_by_id(store_id)
      .one(self.db)
      .await?
      .ok_or(Error::StoreNotFound)?;
    self.by_id(affiliate_id).await?;

    let existing = store_affiliate::Entity::find()
      .filter(store_affiliate::Column::StoreId.eq(store_id))
      .filter(store_affiliate::Column::AffiliateId.eq(affiliate_id))
      .one(self.db)
      .await?;
    if existing.is_some() {
      return Err(Error::InvalidArgs(
        "affiliate is already linked to this store".into(),
      ));
    }

    let now = Utc::now().naive_utc();
    Ok(
      store_affiliate::ActiveModel {
        id: NotSet,
        store_id: Set(store_id),
        affiliate_id: Set(affiliate_id),
        status: Set(LinkStatus::Invited),
        commission_type: Set(ty),
        commission_value: Set(value),
        commission_enabled: Set(true),
        created_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  /// Invite response; only an `invited` link can be accepted or
  /// rejected.
  pub async fn respond(
    &self,
    link_id: i32,
    accept: bool,
  ) -> Result<store_affiliate::Model> {
    let link = store_affiliate::Entity::find_by_id(link_id)
      .one(self.db)
      .await?
      .ok_or(Error::LinkNotFound)?;

    if link.status != LinkStatus::Invited {
      return Err(Error::InvalidTransition);
    }

    let status =
      if accept { LinkStatus::Active } else { LinkStatus::Rejected };

    Ok(
      store_affiliate::ActiveModel { status: Set(status), ..link.into() }
        .update(self.db)
        .await?,
    )
  }

  pub async fn set_default_commission(
    &self,
    link_id: i32,
    ty: CommissionType,
    value: i64,
  ) -> Result<store_affiliate::Model> {
    validate_commission(&ty, value)?;

    let link = store_affiliate::Entity::find_by_id(link_id)
      .one(self.db)
      .await?
      .ok_or(Error::LinkNotFound)?;

    Ok(
      store_affiliate::ActiveModel {
        commission_type: Set(ty),
        commission_value: Set(value),
        ..link.into()
      }
      .update(self.db)
      .await?,
    )
  }

  pub async fn set_commission_enabled(
    &self,
    link_id: i32,
    enabled: bool,
  ) -> Result<store_affiliate::Model> {
    let link = store_affiliate::Entity::find_by_id(link_id)
      .one(self.db)
      .await?
      .ok_or(Error::LinkNotFound)?;

    Ok(
      store_affiliate::ActiveModel {
        commission_enabled: Set(enabled),
        ..link.into()
      }
      .update(self.db)
      .await?,
    )
  }

  pub async fn links_for(
    &self,
    affiliate_id: i32,
  ) -> Result<Vec<store_affiliate::Model>> {
    Ok(
      store_affiliate::Entity::find()
        .filter(store_affiliate::Column::AffiliateId.eq(affiliate_id))
        .all(self.db)
        .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::{fixtures, test_db};

  #[tokio::test]
  async fn invite_then_accept_activates_link() {
    let db = test_db::setup().await;
    let store = fixtures::store(&db, 7).await;
    let affiliate = fixtures::affiliate(&db).await;
    let sv = Affiliates::new(&db);

    let link = sv
      .invite(store.id, affiliate.id, CommissionType::Percentage, 10)
      .await
      .unwrap();
    assert_eq!(link.status, LinkStatus::Invited);

    let link = sv.respond(link.id, true).await.unwrap();
    assert_eq!(link.status, LinkStatus::Active);
  }

  #[tokio::test]
  async fn responding_twice_is_rejected() {
    let db = test_db::setup().await;
    let store = fixtures::store(&db, 7).await;
    let affiliate = fixtures::affiliate(&db).await;
    let sv = Affiliates::new(&db);

    let link = sv
      .invite(store.id, affiliate.id, CommissionType::Percentage, 10)
      .await
      .unwrap();
    sv.respond(link.id, false).await.unwrap();

    assert!(matches!(
      sv.respond(link.id, true).await,
      Err(Error::InvalidTransition)
    ));
  }

  #[tokio::test]
  async fn one_link_per_store_affiliate_pair() {
    let db = test_db::setup().await;
    let store = fixtures::store(&db, 7).await;
    let affiliate = fixtures::affiliate(&db).await;
    let sv = Affiliates::new(&db);

    sv.invite(store.id, affiliate.id, CommissionType::Percentage, 10)
      .await
      .unwrap();

    assert!(matches!(
      sv.invite(store.id, affiliate.id, CommissionType::Fixed, 100).await,
      Err(Error::InvalidArgs(_))
    ));
  }

  #[tokio::test]
  async fn invite_validates_default_commission() {
    let db = test_db::setup().await;
    let store = fixtures::store(&db, 7).await;
    let affiliate = fixtures::affiliate(&db).await;

    let result = Affiliates::new(&db)
      .invite(store.id, affiliate.id, CommissionType::Percentage, 120)
      .await;

    assert!(matches!(result, Err(Error::InvalidCommission(_))));
  }
}
