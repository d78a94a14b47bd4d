//! SurrealDB implementation of [`ProfileRepository`].
//!
//! The record id is the owner id, so `CREATE` on an existing owner fails
//! inside the store; that failure is the create-if-absent guarantee.

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::profile::{
    CreateProfile, LandlordProfile, ProfileCounters,
};
use rentwise_core::models::tenancy::normalize_block;
use rentwise_core::patch::ProfilePatch;
use rentwise_core::repository::ProfileRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use super::{parse_owner, single, to_decimal, to_float};
use crate::error::DbError;

const TABLE: &str = "landlord_profile";

const SELECT_ONE: &str = "SELECT * FROM type::record('landlord_profile', $owner_id) \
     WHERE owner_id = $owner_id";

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    owner_id: String,
    display_name: Option<String>,
    business_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: Option<String>,
    bank: Option<serde_json::Value>,
    settings: Option<serde_json::Value>,
    profile_image: Option<String>,
    verified: bool,
    total_properties: u32,
    active_tenants: u32,
    monthly_revenue: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self) -> Result<LandlordProfile, DbError> {
        Ok(LandlordProfile {
            owner_id: parse_owner(&self.owner_id)?,
            display_name: self.display_name,
            business_name: self.business_name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            bank: normalize_block(self.bank),
            settings: normalize_block(self.settings),
            profile_image: self.profile_image,
            verified: self.verified,
            total_properties: self.total_properties,
            active_tenants: self.active_tenants,
            monthly_revenue: to_decimal(self.monthly_revenue),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn object<T: serde::Serialize>(what: &str, value: &T) -> Result<serde_json::Value, DbError> {
    serde_json::to_value(value).map_err(|e| DbError::decode(what, e))
}

#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn get(&self, owner_id: &OwnerId) -> RentalResult<LandlordProfile> {
        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("owner_id", owner_id.as_str().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, TABLE, owner_id)?.try_into_profile()?)
    }

    async fn create(&self, input: CreateProfile) -> RentalResult<LandlordProfile> {
        let owner = input.owner_id.as_str().to_string();
        let settings = object("settings", &input.settings)?;

        let query = format!(
            "CREATE type::record('landlord_profile', $owner_id) SET \
             owner_id = $owner_id, display_name = $display_name, \
             email = $email, settings = $settings, bank = {{}}, \
             verified = false, total_properties = 0, active_tenants = 0, \
             monthly_revenue = 0.0, created_at = time::now(), \
             updated_at = time::now() RETURN NONE; {SELECT_ONE};"
        );

        let response = self
            .db
            .query(query)
            .bind(("owner_id", owner.clone()))
            .bind(("display_name", input.display_name))
            .bind(("email", input.email))
            .bind(("settings", settings))
            .await
            .map_err(DbError::from)?;

        let mut result = response.check().map_err(|e| match DbError::from(e) {
            DbError::AlreadyExists { .. } => DbError::AlreadyExists {
                entity: TABLE.into(),
                id: owner.clone(),
            },
            other => other,
        })?;

        let rows: Vec<ProfileRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, &owner)?.try_into_profile()?)
    }

    async fn update(
        &self,
        owner_id: &OwnerId,
        patch: ProfilePatch,
    ) -> RentalResult<LandlordProfile> {
        let mut sets = Vec::new();
        if patch.display_name.is_some() {
            sets.push("display_name = $display_name");
        }
        if patch.business_name.is_some() {
            sets.push("business_name = $business_name");
        }
        if patch.phone.is_some() {
            sets.push("phone = $phone");
        }
        if patch.email.is_some() {
            sets.push("email = $email");
        }
        if patch.address.is_some() {
            sets.push("address = $address");
        }
        if patch.bank.is_some() {
            sets.push("bank = $bank");
        }
        if patch.settings.is_some() {
            sets.push("settings = $settings");
        }
        if patch.profile_image.is_some() {
            sets.push("profile_image = $profile_image");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('landlord_profile', $owner_id) SET {} \
             WHERE owner_id = $owner_id RETURN NONE; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("owner_id", owner_id.as_str().to_string()));

        if let Some(display_name) = patch.display_name {
            builder = builder.bind(("display_name", display_name));
        }
        if let Some(business_name) = patch.business_name {
            builder = builder.bind(("business_name", business_name));
        }
        if let Some(phone) = patch.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(email) = patch.email {
            builder = builder.bind(("email", email));
        }
        if let Some(address) = patch.address {
            builder = builder.bind(("address", address));
        }
        if let Some(bank) = patch.bank {
            builder = builder.bind(("bank", object("bank", &bank)?));
        }
        if let Some(settings) = patch.settings {
            builder = builder.bind(("settings", object("settings", &settings)?));
        }
        if let Some(profile_image) = patch.profile_image {
            builder = builder.bind(("profile_image", profile_image));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, owner_id)?.try_into_profile()?)
    }

    async fn update_counters(
        &self,
        owner_id: &OwnerId,
        counters: ProfileCounters,
    ) -> RentalResult<LandlordProfile> {
        let query = format!(
            "UPDATE type::record('landlord_profile', $owner_id) SET \
             total_properties = $total_properties, \
             active_tenants = $active_tenants, \
             monthly_revenue = $monthly_revenue, \
             updated_at = time::now() \
             WHERE owner_id = $owner_id RETURN NONE; {SELECT_ONE};"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("owner_id", owner_id.as_str().to_string()))
            .bind(("total_properties", counters.total_properties))
            .bind(("active_tenants", counters.active_tenants))
            .bind(("monthly_revenue", to_float(counters.monthly_revenue)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, owner_id)?.try_into_profile()?)
    }
}
