//! The SurrealDB-backed [`RentalStore`].

use rentwise_core::repository::RentalStore;
use surrealdb::{Connection, Surreal};

use super::{
    SurrealApplicationRepository, SurrealMaintenanceRepository, SurrealPaymentRepository,
    SurrealProfileRepository, SurrealPropertyRepository, SurrealTenancyRepository,
};

/// All repositories over one shared client.
#[derive(Clone)]
pub struct SurrealRentalStore<C: Connection> {
    profiles: SurrealProfileRepository<C>,
    properties: SurrealPropertyRepository<C>,
    tenancies: SurrealTenancyRepository<C>,
    applications: SurrealApplicationRepository<C>,
    maintenance: SurrealMaintenanceRepository<C>,
    payments: SurrealPaymentRepository<C>,
}

impl<C: Connection> SurrealRentalStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            profiles: SurrealProfileRepository::new(db.clone()),
            properties: SurrealPropertyRepository::new(db.clone()),
            tenancies: SurrealTenancyRepository::new(db.clone()),
            applications: SurrealApplicationRepository::new(db.clone()),
            maintenance: SurrealMaintenanceRepository::new(db.clone()),
            payments: SurrealPaymentRepository::new(db),
        }
    }
}

impl<C: Connection> RentalStore for SurrealRentalStore<C> {
    type Profiles = SurrealProfileRepository<C>;
    type Properties = SurrealPropertyRepository<C>;
    type Tenancies = SurrealTenancyRepository<C>;
    type Applications = SurrealApplicationRepository<C>;
    type Maintenance = SurrealMaintenanceRepository<C>;
    type Payments = SurrealPaymentRepository<C>;

    fn profiles(&self) -> &Self::Profiles {
        &self.profiles
    }

    fn properties(&self) -> &Self::Properties {
        &self.properties
    }

    fn tenancies(&self) -> &Self::Tenancies {
        &self.tenancies
    }

    fn applications(&self) -> &Self::Applications {
        &self.applications
    }

    fn maintenance(&self) -> &Self::Maintenance {
        &self.maintenance
    }

    fn payments(&self) -> &Self::Payments {
        &self.payments
    }
}
