use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    Json,
};

use crate::common::PaginationParams;
use crate::domains::goods::{CreateGoods, Goods, UpdateGoods};
use crate::server::app::AppState;
use crate::server::error::ApiError;

const NOT_FOUND: &str = "Goods not found";

pub async fn create_goods_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CreateGoods>, JsonRejection>,
) -> Result<(StatusCode, Json<Goods>), ApiError> {
    let Json(input) = payload?;
    let goods = Goods::create(input, &state.db_pool).await?;
    tracing::debug!(goods_id = goods.id, "Created goods");
    Ok((StatusCode::CREATED, Json(goods)))
}

pub async fn list_goods_handler(
    Extension(state): Extension<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<Vec<Goods>>, ApiError> {
    let Query(params) = params?;
    let page = params
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    let goods = Goods::find_all(page.skip, page.limit, &state.db_pool).await?;
    Ok(Json(goods))
}

pub async fn get_goods_handler(
    Extension(state): Extension<AppState>,
    goods_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Goods>, ApiError> {
    let Path(goods_id) = goods_id?;
    Goods::find_by_id(goods_id, &state.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn update_goods_handler(
    Extension(state): Extension<AppState>,
    goods_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateGoods>, JsonRejection>,
) -> Result<Json<Goods>, ApiError> {
    let Path(goods_id) = goods_id?;
    let Json(input) = payload?;
    Goods::update(goods_id, input, &state.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))
}

pub async fn delete_goods_handler(
    Extension(state): Extension<AppState>,
    goods_id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(goods_id) = goods_id?;
    if Goods::delete(goods_id, &state.db_pool).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(NOT_FOUND.to_string()))
    }
}
