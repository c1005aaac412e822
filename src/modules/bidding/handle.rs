use actix_web::{web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success::Success},
    middlewares::get_claims,
    modules::{
        bid::repository_pg::BidRepositoryPg,
        bidding::{
            model::{BidView, CreateBidBody, PaymentBody, UpdateBidStatusBody},
            service::BiddingService,
        },
        company::repository_pg::CompanyRepositoryPg,
        upload::{
            model::{AvailableUploadsQuery, UploadSummary},
            repository_pg::UploadRepositoryPg,
            schema::UploadEntity,
        },
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type BiddingSvc = BiddingService<BidRepositoryPg, UploadRepositoryPg, CompanyRepositoryPg>;

pub async fn create_bid(
    bidding_service: web::Data<BiddingSvc>,
    req: HttpRequest,
    body: ValidatedJson<CreateBidBody>,
) -> Result<Success<BidView>, error::Error> {
    let company_id = get_claims(&req)?.sub;
    let body = body.0;

    let bid = bidding_service
        .create_bid(body.upload_id, company_id, body.amount, body.message)
        .await?;

    Ok(Success::created(Some(bid)).message("Bid placed successfully"))
}

pub async fn list_available_uploads(
    bidding_service: web::Data<BiddingSvc>,
    query: ValidatedQuery<AvailableUploadsQuery>,
) -> Result<Success<Vec<UploadSummary>>, error::Error> {
    let uploads = bidding_service.list_available_uploads(query.0.file_type).await?;
    Ok(Success::ok(Some(uploads)).message("Available uploads retrieved successfully"))
}

pub async fn list_my_bids(
    bidding_service: web::Data<BiddingSvc>,
    req: HttpRequest,
) -> Result<Success<Vec<BidView>>, error::Error> {
    let company_id = get_claims(&req)?.sub;
    let bids = bidding_service.list_bids_for_company(company_id).await?;
    Ok(Success::ok(Some(bids)).message("Company bids retrieved successfully"))
}

pub async fn record_payment(
    bidding_service: web::Data<BiddingSvc>,
    req: HttpRequest,
    bid_id: web::Path<Uuid>,
    body: ValidatedJson<PaymentBody>,
) -> Result<Success<BidView>, error::Error> {
    let company_id = get_claims(&req)?.sub;
    let bid = bidding_service
        .record_payment(bid_id.into_inner(), company_id, &body.0.transaction_id)
        .await?;
    Ok(Success::ok(Some(bid)).message("Payment recorded successfully"))
}

pub async fn list_bids_for_upload(
    bidding_service: web::Data<BiddingSvc>,
    req: HttpRequest,
    upload_id: web::Path<Uuid>,
) -> Result<Success<Vec<BidView>>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let bids = bidding_service.list_bids_for_upload(upload_id.into_inner(), owner_id).await?;
    Ok(Success::ok(Some(bids)).message("Upload bids retrieved successfully"))
}

pub async fn update_bid_status(
    bidding_service: web::Data<BiddingSvc>,
    req: HttpRequest,
    bid_id: web::Path<Uuid>,
    body: ValidatedJson<UpdateBidStatusBody>,
) -> Result<Success<BidView>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let bid = bidding_service
        .update_bid_status(bid_id.into_inner(), body.0.status, owner_id)
        .await?;

    let message = format!("Bid {} successfully", bid.status.as_str());
    Ok(Success::ok(Some(bid)).message(message))
}

pub async fn withdraw_upload(
    bidding_service: web::Data<BiddingSvc>,
    req: HttpRequest,
    upload_id: web::Path<Uuid>,
) -> Result<Success<UploadEntity>, error::Error> {
    let owner_id = get_claims(&req)?.sub;
    let upload = bidding_service.withdraw_upload(upload_id.into_inner(), owner_id).await?;
    Ok(Success::ok(Some(upload)).message("Upload withdrawn from bidding"))
}
