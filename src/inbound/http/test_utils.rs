//! In-memory port implementations shared by handler tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;

use crate::domain::account::{AccountId, NewAccount, Phone, Role, StoredAccount};
use crate::domain::listing::{Listing, ListingId, ListingLimits, NewListing};
use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, DiagnosisRequest, DiagnosisSource,
    DiagnosisSourceError, ImageStore, ImageStoreError, ListingPersistenceError,
    ListingRepository, PasswordHashError, PasswordHasher, PredictionPersistenceError,
    PredictionRepository, StoredImage,
};
use crate::domain::prediction::{Diagnosis, NewPrediction, PredictionId, PredictionRecord};
use crate::domain::{AccountService, ListingService, PredictionService};
use crate::inbound::http::state::HttpState;

#[derive(Default)]
pub(crate) struct MemoryAccountRepository {
    farmers: Mutex<Vec<StoredAccount>>,
    customers: Mutex<Vec<StoredAccount>>,
}

impl MemoryAccountRepository {
    fn rows(&self, role: Role) -> &Mutex<Vec<StoredAccount>> {
        match role {
            Role::Farmer => &self.farmers,
            Role::Customer => &self.customers,
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(
        &self,
        role: Role,
        account: &NewAccount,
    ) -> Result<AccountId, AccountPersistenceError> {
        let mut rows = self.rows(role).lock().expect("rows lock");
        let id = AccountId::new(i32::try_from(rows.len()).expect("small test table") + 1);
        rows.push(StoredAccount {
            id,
            username: account.username.as_str().to_owned(),
            phone: account.phone.as_str().to_owned(),
            password_hash: account.password_hash.clone(),
        });
        Ok(id)
    }

    async fn find_by_phone(
        &self,
        role: Role,
        phone: &Phone,
    ) -> Result<Option<StoredAccount>, AccountPersistenceError> {
        Ok(self
            .rows(role)
            .lock()
            .expect("rows lock")
            .iter()
            .find(|row| row.phone == phone.as_str())
            .cloned())
    }
}

/// Reversible fake hash; bcrypt is deliberately slow and tests are not.
pub(crate) struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash == format!("hashed:{password}"))
    }
}

#[derive(Default)]
pub(crate) struct MemoryListingRepository {
    rows: Mutex<Vec<Listing>>,
}

#[async_trait]
impl ListingRepository for MemoryListingRepository {
    async fn insert(&self, listing: &NewListing) -> Result<ListingId, ListingPersistenceError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let id = ListingId::new(i32::try_from(rows.len()).expect("small test table") + 1);
        rows.push(Listing {
            id,
            product_name: listing.product_name.clone(),
            price: listing.price,
            quantity: listing.quantity,
            quality: listing.quality.clone(),
            description: listing.description.clone(),
            contact_number: listing.contact_number.clone(),
            image_path: listing.image_path.clone(),
            currency: listing.currency.clone(),
            quantity_unit: listing.quantity_unit.clone(),
            created_at: chrono::Utc::now(),
        });
        Ok(id)
    }

    async fn list_newest_first(&self) -> Result<Vec<Listing>, ListingPersistenceError> {
        let mut rows = self.rows.lock().expect("rows lock").clone();
        rows.sort_by(|a, b| b.id.value().cmp(&a.id.value()));
        Ok(rows)
    }
}

#[derive(Default)]
pub(crate) struct MemoryPredictionRepository {
    rows: Mutex<HashMap<i32, PredictionRecord>>,
}

#[async_trait]
impl PredictionRepository for MemoryPredictionRepository {
    async fn insert(
        &self,
        prediction: &NewPrediction,
    ) -> Result<PredictionId, PredictionPersistenceError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let id = PredictionId::new(i32::try_from(rows.len()).expect("small test table") + 1);
        rows.insert(
            id.value(),
            PredictionRecord {
                id,
                image_path: prediction.image_path.clone(),
                description: prediction.description.clone(),
                language: prediction.language.clone(),
                diagnosis: None,
                created_at: chrono::Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_by_id(
        &self,
        id: PredictionId,
    ) -> Result<Option<PredictionRecord>, PredictionPersistenceError> {
        Ok(self.rows.lock().expect("rows lock").get(&id.value()).cloned())
    }

    async fn attach_diagnosis(
        &self,
        id: PredictionId,
        diagnosis: &Diagnosis,
    ) -> Result<(), PredictionPersistenceError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let record = rows
            .get_mut(&id.value())
            .ok_or(PredictionPersistenceError::Missing)?;
        record.diagnosis = Some(diagnosis.clone());
        Ok(())
    }
}

/// Diagnosis source returning a canned reply.
pub(crate) struct CannedDiagnosisSource {
    pub reply: Result<Diagnosis, DiagnosisSourceError>,
}

impl CannedDiagnosisSource {
    pub fn structured() -> Self {
        Self {
            reply: Ok(Diagnosis::Structured {
                disease_name: "leaf spot".into(),
                cause: "fungal infection".into(),
                explanation: "spores spread in humid conditions".into(),
                remedy: "neem oil spray".into(),
            }),
        }
    }
}

#[async_trait]
impl DiagnosisSource for CannedDiagnosisSource {
    async fn diagnose(
        &self,
        _request: &DiagnosisRequest,
    ) -> Result<Diagnosis, DiagnosisSourceError> {
        self.reply.clone()
    }
}

/// Image store recording names without touching the filesystem.
#[derive(Default)]
pub(crate) struct MemoryImageStore {
    pub stored: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn store(
        &self,
        original_name: &str,
        _bytes: &[u8],
    ) -> Result<StoredImage, ImageStoreError> {
        let public_path = format!("/uploads/{original_name}");
        self.stored
            .lock()
            .expect("stored lock")
            .push(public_path.clone());
        Ok(StoredImage { public_path })
    }
}

/// Build a fully in-memory [`HttpState`] for handler tests.
pub(crate) fn test_state() -> web::Data<HttpState> {
    test_state_with_diagnosis(CannedDiagnosisSource::structured())
}

pub(crate) fn test_state_with_diagnosis(
    diagnosis: CannedDiagnosisSource,
) -> web::Data<HttpState> {
    let accounts = Arc::new(AccountService::new(
        Arc::new(MemoryAccountRepository::default()),
        Arc::new(PlainHasher),
    ));
    let listings = Arc::new(ListingService::new(
        Arc::new(MemoryListingRepository::default()),
        ListingLimits::default(),
    ));
    let predictions = Arc::new(PredictionService::new(
        Arc::new(MemoryPredictionRepository::default()),
        Arc::new(diagnosis),
    ));
    web::Data::new(HttpState {
        accounts,
        listings,
        predictions,
        images: Arc::new(MemoryImageStore::default()),
        static_root: PathBuf::from("public"),
    })
}
