//! In-memory stand-ins for the Postgres repositories, media storage and the push gateway.
//! One mutex guards all tables so multi-row operations are atomic, like a transaction.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        bid::{
            model::{AcceptOutcome, InsertBid, WithdrawOutcome},
            repository::{BidRepo, BidRepository},
            schema::{BidDetail, BidEntity, BidStatus},
        },
        company::{
            model::InsertCompany,
            repository::CompanyRepository,
            schema::{CompanyEntity, CompanyType},
        },
        notification::{
            dispatcher::NotificationDispatcher,
            model::{Notification, Recipient},
            repository::DeviceTokenRepository,
        },
        upload::{
            model::{InsertUpload, UploadSummary},
            repository::UploadRepository,
            schema::{FileType, UploadEntity, UploadStatus},
            storage::{MediaStorage, StoredMedia},
        },
        user::schema::{UserEntity, UserRole},
    },
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserEntity>,
    companies: HashMap<Uuid, CompanyEntity>,
    uploads: HashMap<Uuid, UploadEntity>,
    bids: HashMap<Uuid, BidEntity>,
}

impl Tables {
    fn detail(&self, bid: &BidEntity) -> Option<BidDetail> {
        let company = self.companies.get(&bid.company_id)?;
        let upload = self.uploads.get(&bid.upload_id)?;
        Some(BidDetail {
            bid: bid.clone(),
            company_name: company.company_name.clone(),
            upload_owner_id: upload.user_id,
            upload_title: upload.title.clone(),
        })
    }

    fn details_where(&self, keep: impl Fn(&BidEntity) -> bool) -> Vec<BidDetail> {
        let mut bids: Vec<_> =
            self.bids.values().filter(|b| keep(b)).filter_map(|b| self.detail(b)).collect();
        bids.sort_by(|a, b| (b.bid.created_at, b.bid.id).cmp(&(a.bid.created_at, a.bid.id)));
        bids
    }

    fn set_bid_status(&mut self, bid_id: &Uuid, status: BidStatus) -> Option<BidEntity> {
        let bid = self.bids.get_mut(bid_id)?;
        bid.status = status;
        bid.updated_at = chrono::Utc::now();
        Some(bid.clone())
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn add_user(&self, username: &str) -> Uuid {
        let now = chrono::Utc::now();
        let user = UserEntity {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            phone_number: "+10000000000".into(),
            hash_password: String::new(),
            role: UserRole::User,
            fcm_token: None,
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.lock().users.insert(id, user);
        id
    }

    pub fn add_company(&self, name: &str) -> Uuid {
        let now = chrono::Utc::now();
        let company = CompanyEntity {
            id: Uuid::now_v7(),
            company_name: name.to_string(),
            company_email: format!("{}@press.example.com", name.to_lowercase().replace(' ', "-")),
            hash_password: String::new(),
            phone_number: "0123456789".into(),
            company_address: "1 Press Street".into(),
            company_website: None,
            business_license: "LIC-1".into(),
            company_type: CompanyType::Press,
            is_verified: false,
            is_active: true,
            fcm_token: None,
            created_at: now,
            updated_at: now,
        };
        let id = company.id;
        self.lock().companies.insert(id, company);
        id
    }

    /// An image upload open for bidding.
    pub fn add_upload(&self, owner_id: Uuid, title: &str) -> Uuid {
        let now = chrono::Utc::now();
        let id = Uuid::now_v7();
        let upload = UploadEntity {
            id,
            user_id: owner_id,
            title: title.to_string(),
            description: format!("{title} description"),
            filename: "photo.png".into(),
            file_url: format!("memory://{id}"),
            storage_key: id.to_string(),
            file_type: FileType::Image,
            file_size: 1024,
            watermarked_preview_url: None,
            is_available_for_bidding: true,
            status: UploadStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.lock().uploads.insert(id, upload);
        id
    }

    pub fn upload(&self, upload_id: &Uuid) -> Option<UploadEntity> {
        self.lock().uploads.get(upload_id).cloned()
    }

    pub fn bid(&self, bid_id: &Uuid) -> Option<BidEntity> {
        self.lock().bids.get(bid_id).cloned()
    }
}

#[async_trait::async_trait]
impl UploadRepository for InMemoryStore {
    async fn create(&self, upload: &InsertUpload) -> Result<UploadEntity, error::SystemError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&upload.user_id) {
            return Err(error::SystemError::not_found("Referenced resource not found"));
        }

        let now = chrono::Utc::now();
        let entity = UploadEntity {
            id: Uuid::now_v7(),
            user_id: upload.user_id,
            title: upload.title.clone(),
            description: upload.description.clone(),
            filename: upload.filename.clone(),
            file_url: upload.file_url.clone(),
            storage_key: upload.storage_key.clone(),
            file_type: upload.file_type,
            file_size: upload.file_size,
            watermarked_preview_url: upload.watermarked_preview_url.clone(),
            is_available_for_bidding: true,
            status: UploadStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.uploads.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(
        &self,
        upload_id: &Uuid,
    ) -> Result<Option<UploadEntity>, error::SystemError> {
        Ok(self.upload(upload_id))
    }

    async fn find_owned(
        &self,
        upload_id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<Option<UploadEntity>, error::SystemError> {
        Ok(self.upload(upload_id).filter(|u| u.user_id == *owner_id))
    }

    async fn find_by_owner(&self, owner_id: &Uuid) -> Result<Vec<UploadEntity>, error::SystemError> {
        let mut uploads: Vec<_> =
            self.lock().uploads.values().filter(|u| u.user_id == *owner_id).cloned().collect();
        uploads.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(uploads)
    }

    async fn find_available_for_bidding(
        &self,
        file_type: Option<FileType>,
    ) -> Result<Vec<UploadSummary>, error::SystemError> {
        let tables = self.lock();
        let mut uploads: Vec<_> = tables
            .uploads
            .values()
            .filter(|u| u.is_available_for_bidding)
            .filter(|u| file_type.is_none_or(|t| u.file_type == t))
            .filter_map(|u| {
                let uploader = tables.users.get(&u.user_id)?;
                Some(UploadSummary {
                    id: u.id,
                    title: u.title.clone(),
                    description: u.description.clone(),
                    filename: u.filename.clone(),
                    file_type: u.file_type,
                    file_size: u.file_size,
                    watermarked_preview_url: u.watermarked_preview_url.clone(),
                    uploader_id: uploader.id,
                    uploader_username: uploader.username.clone(),
                    created_at: u.created_at,
                })
            })
            .collect();
        uploads.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(uploads)
    }

    async fn mark_unavailable(&self, upload_id: &Uuid) -> Result<(), error::SystemError> {
        if let Some(upload) = self.lock().uploads.get_mut(upload_id) {
            upload.is_available_for_bidding = false;
        }
        Ok(())
    }

    async fn set_status(
        &self,
        upload_id: &Uuid,
        status: UploadStatus,
    ) -> Result<bool, error::SystemError> {
        let mut tables = self.lock();
        match tables.uploads.get_mut(upload_id) {
            Some(upload) if upload.status.can_advance_to(status) => {
                upload.status = status;
                upload.updated_at = chrono::Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, upload_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tables = self.lock();
        tables.bids.retain(|_, b| b.upload_id != *upload_id);
        Ok(tables.uploads.remove(upload_id).is_some())
    }
}

#[async_trait::async_trait]
impl BidRepository for InMemoryStore {
    async fn create(&self, bid: &InsertBid) -> Result<BidEntity, error::SystemError> {
        let mut tables = self.lock();

        if !tables.uploads.get(&bid.upload_id).is_some_and(|u| u.is_available_for_bidding) {
            return Err(error::SystemError::not_found(
                "Upload not found or not available for bidding",
            ));
        }
        if tables.bids.values().any(|b| {
            b.upload_id == bid.upload_id
                && b.company_id == bid.company_id
                && b.status == BidStatus::Pending
        }) {
            return Err(error::SystemError::conflict(
                "You already have a pending bid for this upload",
            ));
        }

        let now = chrono::Utc::now();
        let entity = BidEntity {
            id: Uuid::now_v7(),
            upload_id: bid.upload_id,
            company_id: bid.company_id,
            amount: bid.amount,
            message: bid.message.clone(),
            status: BidStatus::Pending,
            expires_at: bid.expires_at,
            is_paid: false,
            payment_transaction_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.bids.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn find_by_id(&self, bid_id: &Uuid) -> Result<Option<BidEntity>, error::SystemError> {
        Ok(self.bid(bid_id))
    }

    async fn find_detail_by_id(
        &self,
        bid_id: &Uuid,
    ) -> Result<Option<BidDetail>, error::SystemError> {
        let tables = self.lock();
        Ok(tables.bids.get(bid_id).and_then(|b| tables.detail(b)))
    }

    async fn find_pending_by_upload_and_company(
        &self,
        upload_id: &Uuid,
        company_id: &Uuid,
    ) -> Result<Option<BidEntity>, error::SystemError> {
        Ok(self
            .lock()
            .bids
            .values()
            .find(|b| {
                b.upload_id == *upload_id
                    && b.company_id == *company_id
                    && b.status == BidStatus::Pending
            })
            .cloned())
    }

    async fn list_by_upload(&self, upload_id: &Uuid) -> Result<Vec<BidDetail>, error::SystemError> {
        Ok(self.lock().details_where(|b| b.upload_id == *upload_id))
    }

    async fn list_by_company(
        &self,
        company_id: &Uuid,
    ) -> Result<Vec<BidDetail>, error::SystemError> {
        Ok(self.lock().details_where(|b| b.company_id == *company_id))
    }

    async fn update_status(
        &self,
        bid_id: &Uuid,
        status: BidStatus,
    ) -> Result<BidEntity, error::SystemError> {
        let mut tables = self.lock();
        match tables.bids.get(bid_id).map(|b| b.status) {
            Some(BidStatus::Pending) => tables
                .set_bid_status(bid_id, status)
                .ok_or_else(|| error::SystemError::not_found("Bid not found")),
            Some(_) => Err(error::SystemError::invalid_transition("Bid status cannot be changed")),
            None => Err(error::SystemError::not_found("Bid not found")),
        }
    }

    async fn reject_pending_for_upload(
        &self,
        upload_id: &Uuid,
    ) -> Result<Vec<BidEntity>, error::SystemError> {
        let mut tables = self.lock();
        let pending: Vec<Uuid> = tables
            .bids
            .values()
            .filter(|b| b.upload_id == *upload_id && b.status == BidStatus::Pending)
            .map(|b| b.id)
            .collect();

        Ok(pending
            .iter()
            .filter_map(|id| tables.set_bid_status(id, BidStatus::Rejected))
            .collect())
    }

    async fn mark_paid(
        &self,
        bid_id: &Uuid,
        transaction_id: &str,
    ) -> Result<Option<BidEntity>, error::SystemError> {
        let mut tables = self.lock();
        match tables.bids.get_mut(bid_id) {
            Some(bid) if bid.status == BidStatus::Accepted && !bid.is_paid => {
                bid.is_paid = true;
                bid.payment_transaction_id = Some(transaction_id.to_string());
                bid.updated_at = chrono::Utc::now();
                Ok(Some(bid.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn expire_overdue(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64, error::SystemError> {
        let mut tables = self.lock();
        let mut expired = 0;
        for bid in tables.bids.values_mut() {
            if bid.status == BidStatus::Pending && bid.expires_at < now {
                bid.status = BidStatus::Expired;
                expired += 1;
            }
        }
        Ok(expired)
    }
}

#[async_trait::async_trait]
impl BidRepo for InMemoryStore {
    async fn accept_bid_atomic(
        &self,
        bid_id: &Uuid,
        upload_id: &Uuid,
    ) -> Result<AcceptOutcome, error::SystemError> {
        let mut tables = self.lock();

        if !tables.uploads.get(upload_id).is_some_and(|u| u.is_available_for_bidding) {
            return Err(error::SystemError::invalid_transition(
                "Upload is no longer available for bidding",
            ));
        }
        if !tables
            .bids
            .get(bid_id)
            .is_some_and(|b| b.upload_id == *upload_id && b.status == BidStatus::Pending)
        {
            return Err(error::SystemError::invalid_transition("Bid status cannot be changed"));
        }

        if let Some(upload) = tables.uploads.get_mut(upload_id) {
            upload.is_available_for_bidding = false;
            upload.status = UploadStatus::Accepted;
        }

        let accepted = tables
            .set_bid_status(bid_id, BidStatus::Accepted)
            .ok_or_else(|| error::SystemError::not_found("Bid not found"))?;

        let siblings: Vec<Uuid> = tables
            .bids
            .values()
            .filter(|b| {
                b.upload_id == *upload_id && b.status == BidStatus::Pending && b.id != *bid_id
            })
            .map(|b| b.id)
            .collect();
        let rejected = siblings
            .iter()
            .filter_map(|id| tables.set_bid_status(id, BidStatus::Rejected))
            .collect();

        Ok(AcceptOutcome { accepted, rejected })
    }

    async fn withdraw_upload_atomic(
        &self,
        upload_id: &Uuid,
    ) -> Result<WithdrawOutcome, error::SystemError> {
        let mut tables = self.lock();

        let Some(upload) = tables.uploads.get_mut(upload_id) else {
            return Err(error::SystemError::not_found("Upload not found"));
        };
        if matches!(upload.status, UploadStatus::Accepted | UploadStatus::Completed) {
            return Err(error::SystemError::invalid_transition(
                "A bid has already been accepted for this upload",
            ));
        }
        upload.is_available_for_bidding = false;
        upload.status = UploadStatus::Rejected;
        let upload = upload.clone();

        let pending: Vec<Uuid> = tables
            .bids
            .values()
            .filter(|b| b.upload_id == *upload_id && b.status == BidStatus::Pending)
            .map(|b| b.id)
            .collect();
        let rejected = pending
            .iter()
            .filter_map(|id| tables.set_bid_status(id, BidStatus::Rejected))
            .collect();

        Ok(WithdrawOutcome { upload, rejected })
    }
}

#[async_trait::async_trait]
impl CompanyRepository for InMemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CompanyEntity>, error::SystemError> {
        Ok(self.lock().companies.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CompanyEntity>, error::SystemError> {
        Ok(self.lock().companies.values().find(|c| c.company_email == email).cloned())
    }

    async fn create(&self, company: &InsertCompany) -> Result<CompanyEntity, error::SystemError> {
        let mut tables = self.lock();
        if tables.companies.values().any(|c| c.company_email == company.company_email) {
            return Err(error::SystemError::conflict("Email already exists"));
        }

        let now = chrono::Utc::now();
        let entity = CompanyEntity {
            id: Uuid::now_v7(),
            company_name: company.company_name.clone(),
            company_email: company.company_email.clone(),
            hash_password: company.hash_password.clone(),
            phone_number: company.phone_number.clone(),
            company_address: company.company_address.clone(),
            company_website: company.company_website.clone(),
            business_license: company.business_license.clone(),
            company_type: company.company_type,
            is_verified: false,
            is_active: true,
            fcm_token: None,
            created_at: now,
            updated_at: now,
        };
        tables.companies.insert(entity.id, entity.clone());
        Ok(entity)
    }
}

#[async_trait::async_trait]
impl DeviceTokenRepository for InMemoryStore {
    async fn find_token(
        &self,
        recipient: &Recipient,
    ) -> Result<Option<String>, error::SystemError> {
        let tables = self.lock();
        Ok(match recipient {
            Recipient::User(id) => tables.users.get(id).and_then(|u| u.fcm_token.clone()),
            Recipient::Company(id) => tables.companies.get(id).and_then(|c| c.fcm_token.clone()),
        })
    }

    async fn save_token(
        &self,
        recipient: &Recipient,
        token: &str,
    ) -> Result<bool, error::SystemError> {
        let mut tables = self.lock();
        let slot = match recipient {
            Recipient::User(id) => tables.users.get_mut(id).map(|u| &mut u.fcm_token),
            Recipient::Company(id) => tables.companies.get_mut(id).map(|c| &mut c.fcm_token),
        };
        match slot {
            Some(slot) => {
                *slot = Some(token.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl MediaStorage for MemoryStorage {
    async fn store(
        &self,
        _original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredMedia, error::SystemError> {
        let key = Uuid::now_v7().to_string();
        self.objects.lock().unwrap().insert(key.clone(), bytes.to_vec());
        Ok(StoredMedia { url: format!("memory://{key}"), storage_key: key, preview_url: None })
    }

    async fn remove(&self, storage_key: &str) -> Result<(), error::SystemError> {
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }
}

/// Forwards every notification to a channel the test reads from.
pub struct RecordingDispatcher {
    sender: UnboundedSender<Notification>,
}

impl RecordingDispatcher {
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait::async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn notify(&self, notification: &Notification) -> bool {
        self.sender.send(notification.clone()).is_ok()
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Refuses every notification, like an unreachable push gateway. Counts the attempts.
#[derive(Default)]
pub struct FailingDispatcher {
    attempts: std::sync::atomic::AtomicUsize,
}

impl FailingDispatcher {
    pub fn attempts(&self) -> usize {
        self.attempts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn notify(&self, _notification: &Notification) -> bool {
        self.attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        false
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Seeding for tests that run against a real database through `#[sqlx::test]`.
pub mod pg {
    use uuid::Uuid;

    use crate::modules::upload::{
        model::InsertUpload, repository::UploadRepository, repository_pg::UploadRepositoryPg,
        schema::FileType,
    };

    pub async fn seed_user(pool: &sqlx::PgPool, username: &str) -> Uuid {
        let id = Uuid::now_v7();
        let tail = id.simple().to_string()[20..].to_string();
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (id, username, email, phone_number, hash_password)
            VALUES ($1, $2, $3, $4, '')
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(format!("+{tail}"))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    pub async fn seed_company(pool: &sqlx::PgPool, name: &str) -> Uuid {
        let id = Uuid::now_v7();
        // random tail of the v7 id keeps the unique columns apart
        let tail = id.simple().to_string()[20..].to_string();
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO companies (
                id, company_name, company_email, hash_password, phone_number,
                company_address, business_license
            )
            VALUES ($1, $2, $3, '', $4, '1 Press Street', $5)
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(format!("{tail}@press.example.com"))
        .bind(format!("+{tail}"))
        .bind(format!("LIC-{tail}"))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    /// An image upload open for bidding.
    pub async fn seed_upload(pool: &sqlx::PgPool, owner_id: Uuid, title: &str) -> Uuid {
        let upload = UploadRepositoryPg::new(pool.clone())
            .create(&InsertUpload {
                user_id: owner_id,
                title: title.to_string(),
                description: format!("{title} description"),
                filename: "photo.png".into(),
                file_url: "http://localhost/media/photo.png".into(),
                storage_key: Uuid::now_v7().to_string(),
                file_type: FileType::Image,
                file_size: 1024,
                watermarked_preview_url: None,
            })
            .await
            .unwrap();
        upload.id
    }
}
