use crate::{
  entity::{
    CommissionType, CouponScope, coupon, coupon_link, earning, store,
    store_affiliate,
  },
  prelude::*,
  sv::rule::validate_commission,
};

pub struct Coupons<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Coupons<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    store_id: i32,
    code: &str,
    discount_type: CommissionType,
    discount_value: i64,
    scope: CouponScope,
    scope_target: Option<String>,
  ) -> Result<coupon::Model> {
    validate_commission(&discount_type, discount_value)?;

    let code = code.trim();
    if code.is_empty() {
      return Err(Error::InvalidArgs("coupon code must not be empty".into()));
    }
    if scope != CouponScope::All && scope_target.is_none() {
      return Err(Error::InvalidArgs(
        "category and product coupons need a scope target".into(),
      ));
    }

    store::Entity::find_by_id(store_id)
      .one(self.db)
      .await?
      .ok_or(Error::StoreNotFound)?;

    let duplicate = coupon::Entity::find()
      .filter(coupon::Column::StoreId.eq(store_id))
      .filter(coupon::Column::Code.eq(code))
      .one(self.db)
      .await?;
    if duplicate.is_some() {
      return Err(Error::InvalidArgs(format!(
        "coupon code {code:?} already exists in this store"
      )));
    }

    let now = Utc::now().naive_utc();
    Ok(
      coupon::ActiveModel {
        id: NotSet,
        store_id: Set(store_id),
        code: Set(code.to_string()),
        discount_type: Set(discount_type),
        discount_value: Set(discount_value),
        scope: Set(scope),
        scope_target: Set(scope_target),
        store_affiliate_id: Set(None),
        created_at: Set(now),
      }
      .insert(self.db)
      .await?,
    )
  }

  pub async fn by_code(
    &self,
    store_id: i32,
    code: &str,
  ) -> Result<Option<coupon::Model>> {
    Ok(
      coupon::Entity::find()
        .filter(coupon::Column::StoreId.eq(store_id))
        .filter(coupon::Column::Code.eq(code.trim()))
        .one(self.db)
        .await?,
    )
  }

  /// Whether any earning was ever attributed through the coupon. A
  /// locked coupon keeps its affiliate links forever, preserving
  /// commission attribution history.
  pub async fn locked(&self, coupon_id: i32) -> Result<bool> {
    let attributed = earning::Entity::find()
      .filter(earning::Column::CouponId.eq(coupon_id))
      .count(self.db)
      .await?;
    Ok(attributed > 0)
  }

  pub async fn link_affiliate(
    &self,
    coupon_id: i32,
    link_id: i32,
  ) -> Result<()> {
    let coupon = coupon::Entity::find_by_id(coupon_id)
      .one(self.db)
      .await?
      .ok_or(Error::CouponNotFound)?;

    let link = store_affiliate::Entity::find_by_id(link_id)
      .one(self.db)
      .await?
      .ok_or(Error::LinkNotFound)?;

    if link.store_id != coupon.store_id {
      return Err(Error::InvalidArgs(
        "coupon and affiliate belong to different stores".into(),
      ));
    }

    let already = coupon_link::Entity::find_by_id((coupon.id, link.id))
      .one(self.db)
      .await?;
    if already.is_some() {
      return Ok(());
    }

    if self.locked(coupon.id).await? {
      return Err(Error::CouponLinkLocked);
    }

    let now = Utc::now().naive_utc();
    coupon_link::ActiveModel {
      coupon_id: Set(coupon.id),
      store_affiliate_id: Set(link.id),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    Ok(())
  }

  pub async fn unlink_affiliate(
    &self,
    coupon_id: i32,
    link_id: i32,
  ) -> Result<()> {
    coupon_link::Entity::find_by_id((coupon_id, link_id))
      .one(self.db)
      .await?
      .ok_or(Error::LinkNotFound)?;

    if self.locked(coupon_id).await? {
      return Err(Error::CouponLinkLocked);
    }

    coupon_link::Entity::delete_by_id((coupon_id, link_id))
      .exec(self.db)
      .await?;
    Ok(())
  }

  /// Store-affiliate links the coupon earns for: the junction rows
  /// plus the legacy single-link column, deduplicated.
  pub async fn affiliates_for(
    &self,
    coupon: &coupon::Model,
  ) -> Result<Vec<store_affiliate::Model>> {
    let mut links: Vec<store_affiliate::Model> = coupon_link::Entity::find()
      .filter(coupon_link::Column::CouponId.eq(coupon.id))
      .find_also_related(store_affiliate::Entity)
      .all(self.db)
      .await?
      .into_iter()
      .filter_map(|(_, link)| link)
      .collect();

    if let Some(legacy_id) = coupon.store_affiliate_id
      && !links.iter().any(|link| link.id == legacy_id)
      && let Some(link) =
        store_affiliate::Entity::find_by_id(legacy_id).one(self.db).await?
    {
      links.push(link);
    }

    Ok(links)
  }
}
