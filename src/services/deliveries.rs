use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::Deserialize;

use crate::domain::audit::AuditAction;
use crate::domain::delivery::{DeliveryListQuery, DeliveryView, Reconciliation};
use crate::domain::permission::{PermissionAction, pages};
use crate::domain::station::Station;
use crate::forms::blank_as_none;
use crate::forms::deliveries::AddDeliveryForm;
use crate::repository::{AuditWriter, DeliveryReader, DeliveryWriter, StationReader, UserReader};
use crate::services::access::authorize;
use crate::services::stations::{all_stations, station_name};
use crate::services::{ServiceError, ServiceResult, audit, total_pages};

#[derive(Debug, Default, Deserialize)]
pub struct DeliveryQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub station_id: Option<i32>,
    pub page: Option<usize>,
}

pub struct DeliveriesPageData {
    pub deliveries: Paginated<DeliveryView>,
    pub stations: Vec<Station>,
    pub station_id: Option<i32>,
}

pub fn load_deliveries<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: DeliveryQuery,
) -> ServiceResult<DeliveriesPageData>
where
    R: DeliveryReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::DELIVERIES, PermissionAction::View)?;

    let page = query.page.unwrap_or(1);
    let mut list_query =
        DeliveryListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(station_id) = query.station_id {
        list_query = list_query.station(station_id);
    }

    let (total, deliveries) = repo
        .list_deliveries(list_query)
        .map_err(ServiceError::from)?;
    let stations = all_stations(repo, user.hub_id)?;

    let deliveries = deliveries
        .into_iter()
        .map(|delivery| {
            let name = station_name(&stations, delivery.station_id);
            DeliveryView::new(delivery, name)
        })
        .collect();

    Ok(DeliveriesPageData {
        deliveries: Paginated::new(deliveries, page, total_pages(total)),
        stations,
        station_id: query.station_id,
    })
}

pub fn load_delivery<R>(
    repo: &R,
    user: &AuthenticatedUser,
    delivery_id: i32,
) -> ServiceResult<DeliveryView>
where
    R: DeliveryReader + StationReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::DELIVERIES, PermissionAction::View)?;

    let delivery = repo
        .get_delivery_by_id(delivery_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    let station = repo
        .get_station_by_id(delivery.station_id, user.hub_id)
        .map_err(ServiceError::from)?;

    Ok(DeliveryView::new(delivery, station.map(|station| station.name)))
}

/// Before/after reconciliation of a single delivery.
pub fn load_reconciliation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    delivery_id: i32,
) -> ServiceResult<Reconciliation>
where
    R: DeliveryReader + UserReader + ?Sized,
{
    authorize(repo, user, pages::DELIVERIES, PermissionAction::View)?;

    repo.get_delivery_by_id(delivery_id, user.hub_id)
        .map_err(ServiceError::from)?
        .map(|delivery| delivery.reconcile())
        .ok_or(ServiceError::NotFound)
}

/// Record a delivery. Out-of-tolerance deliveries are saved and flagged.
pub fn create_delivery<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddDeliveryForm,
) -> ServiceResult<DeliveryView>
where
    R: DeliveryWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::DELIVERIES, PermissionAction::Create)?;

    let new_delivery = form
        .into_new_delivery(user.hub_id, &user.email)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let delivery = repo
        .create_delivery(&new_delivery)
        .map_err(ServiceError::from)?;
    let view = DeliveryView::new(delivery, None);

    for grade in view.reconciliation.flagged_grades() {
        log::warn!(
            "Delivery {} at station {}: {} off by {:.1} gal",
            view.delivery.id,
            view.delivery.station_id,
            grade.grade.label(),
            grade.discrepancy
        );
    }

    Ok(view)
}

pub fn remove_delivery<R>(repo: &R, user: &AuthenticatedUser, delivery_id: i32) -> ServiceResult<()>
where
    R: DeliveryWriter + AuditWriter + UserReader + ?Sized,
{
    authorize(repo, user, pages::DELIVERIES, PermissionAction::Delete)?;

    repo.delete_delivery(delivery_id, user.hub_id)
        .map_err(ServiceError::from)?;

    audit::record(
        repo,
        user,
        AuditAction::Delete,
        pages::DELIVERIES,
        Some(delivery_id),
        None,
    );
    Ok(())
}
