//! SurrealDB implementation of [`PropertyRepository`].

use chrono::{DateTime, Utc};
use rentwise_core::error::RentalResult;
use rentwise_core::models::kind::EntityKind;
use rentwise_core::models::owner::OwnerId;
use rentwise_core::models::property::{CreateProperty, Property};
use rentwise_core::models::status::StatusLabel;
use rentwise_core::patch::PropertyPatch;
use rentwise_core::repository::{ListFilter, PropertyRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::scoped::{ScopedSelect, fetch_scoped};
use super::{parse_owner, parse_status, parse_uuid, single, to_decimal, to_float};
use crate::error::DbError;

const TABLE: &str = "property";

const SELECT_ONE: &str = "SELECT record::id(id) AS record_id, * \
     FROM type::record('property', $id) WHERE owner_id = $owner_id";

#[derive(Debug, SurrealValue)]
struct PropertyRow {
    record_id: String,
    owner_id: String,
    title: String,
    description: String,
    address: String,
    city: String,
    state: String,
    postal_code: String,
    price: f64,
    bedrooms: u32,
    bathrooms: f64,
    square_feet: Option<u32>,
    property_type: String,
    status: String,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PropertyRow {
    fn try_into_property(self) -> Result<Property, DbError> {
        Ok(Property {
            id: parse_uuid("property id", &self.record_id)?,
            owner_id: parse_owner(&self.owner_id)?,
            title: self.title,
            description: self.description,
            address: self.address,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            price: to_decimal(self.price),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            property_type: self.property_type,
            status: parse_status(&self.status)?,
            images: self.images,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SurrealPropertyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPropertyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn select_one(&self, owner_id: &OwnerId, id: Uuid) -> Result<Property, DbError> {
        let mut result = self
            .db
            .query(SELECT_ONE)
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.as_str().to_string()))
            .await?
            .check()?;
        let rows: Vec<PropertyRow> = result.take(0)?;
        single(rows, TABLE, id)?.try_into_property()
    }
}

impl<C: Connection> PropertyRepository for SurrealPropertyRepository<C> {
    async fn create(&self, input: CreateProperty) -> RentalResult<Property> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let query = format!(
            "CREATE type::record('property', $id) SET \
             owner_id = $owner_id, title = $title, \
             description = $description, address = $address, \
             city = $city, state = $state, postal_code = $postal_code, \
             price = $price, bedrooms = $bedrooms, bathrooms = $bathrooms, \
             square_feet = $square_feet, property_type = $property_type, \
             status = $status, images = $images, \
             created_at = time::now(), updated_at = time::now() RETURN NONE; {SELECT_ONE};"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("owner_id", input.owner_id.as_str().to_string()))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("address", input.address))
            .bind(("city", input.city))
            .bind(("state", input.state))
            .bind(("postal_code", input.postal_code))
            .bind(("price", to_float(input.price)))
            .bind(("bedrooms", input.bedrooms))
            .bind(("bathrooms", input.bathrooms))
            .bind(("square_feet", input.square_feet))
            .bind(("property_type", input.property_type))
            .bind(("status", input.status.as_str().to_string()))
            .bind(("images", input.images))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        // Statement 0 is the CREATE, statement 1 reads the record back.
        let rows: Vec<PropertyRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id_str)?.try_into_property()?)
    }

    async fn get_by_id(&self, owner_id: &OwnerId, id: Uuid) -> RentalResult<Property> {
        Ok(self.select_one(owner_id, id).await?)
    }

    async fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        filter: &ListFilter,
    ) -> RentalResult<Vec<Property>> {
        let select = ScopedSelect {
            table: TABLE,
            kind: EntityKind::Properties,
            has_status: true,
            filter,
        };
        let rows = fetch_scoped::<C, PropertyRow>(&self.db, select, owner_id).await?;
        Ok(rows.finish(filter.limit, PropertyRow::try_into_property)?)
    }

    async fn update(
        &self,
        owner_id: &OwnerId,
        id: Uuid,
        patch: PropertyPatch,
    ) -> RentalResult<Property> {
        let mut sets = Vec::new();
        if patch.title.is_some() {
            sets.push("title = $title");
        }
        if patch.description.is_some() {
            sets.push("description = $description");
        }
        if patch.address.is_some() {
            sets.push("address = $address");
        }
        if patch.city.is_some() {
            sets.push("city = $city");
        }
        if patch.state.is_some() {
            sets.push("state = $state");
        }
        if patch.postal_code.is_some() {
            sets.push("postal_code = $postal_code");
        }
        if patch.price.is_some() {
            sets.push("price = $price");
        }
        if patch.bedrooms.is_some() {
            sets.push("bedrooms = $bedrooms");
        }
        if patch.bathrooms.is_some() {
            sets.push("bathrooms = $bathrooms");
        }
        if patch.square_feet.is_some() {
            sets.push("square_feet = $square_feet");
        }
        if patch.property_type.is_some() {
            sets.push("property_type = $property_type");
        }
        if patch.status.is_some() {
            sets.push("status = $status");
        }
        if patch.images.is_some() {
            sets.push("images = $images");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('property', $id) SET {} \
             WHERE owner_id = $owner_id RETURN NONE; {SELECT_ONE};",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("owner_id", owner_id.as_str().to_string()));

        if let Some(title) = patch.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = patch.description {
            builder = builder.bind(("description", description));
        }
        if let Some(address) = patch.address {
            builder = builder.bind(("address", address));
        }
        if let Some(city) = patch.city {
            builder = builder.bind(("city", city));
        }
        if let Some(state) = patch.state {
            builder = builder.bind(("state", state));
        }
        if let Some(postal_code) = patch.postal_code {
            builder = builder.bind(("postal_code", postal_code));
        }
        if let Some(price) = patch.price {
            builder = builder.bind(("price", to_float(price)));
        }
        if let Some(bedrooms) = patch.bedrooms {
            builder = builder.bind(("bedrooms", bedrooms));
        }
        if let Some(bathrooms) = patch.bathrooms {
            builder = builder.bind(("bathrooms", bathrooms));
        }
        if let Some(square_feet) = patch.square_feet {
            builder = builder.bind(("square_feet", square_feet));
        }
        if let Some(property_type) = patch.property_type {
            builder = builder.bind(("property_type", property_type));
        }
        if let Some(status) = patch.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(images) = patch.images {
            builder = builder.bind(("images", images));
        }

        let mut result = builder
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, TABLE, id)?.try_into_property()?)
    }
}
