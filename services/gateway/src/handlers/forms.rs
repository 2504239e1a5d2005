//! Browser page handlers
//!
//! Form posts render a result page; failures are shown as the page message.

use std::sync::Arc;

use agripredict_common::{ServiceError, ServiceResult};
use axum::{
    extract::{Form, State, rejection::FormRejection},
    response::Html,
};
use ml_inference::{FertilizerReading, SoilReading};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::{
    dispatcher::Dispatcher,
    handlers::predict::run_flow,
    pages::{FormPage, form_page, landing_page, result_page, statistics_page},
    payload::{CropRequest, FromPayload, Payload, ProductionRequest, RegistrationRequest},
    report::{REGISTRATION_SUCCESS, estimation_report, fertilizer_report, recommendation_report},
};

/// Form extractor result; rejections are shown on the result page
pub type FormBody = Result<Form<FxHashMap<String, String>>, FormRejection>;

fn parse_form<T: FromPayload>(body: FormBody) -> ServiceResult<T> {
    let Form(fields) = body.map_err(|rejection| ServiceError::MalformedInput(rejection.body_text()))?;
    T::from_payload(&Payload::from_form(fields))
}

fn render(flow: &'static str, result: ServiceResult<String>) -> Html<String> {
    match result {
        Ok(page) => Html(page),
        Err(e) => {
            warn!(flow, code = e.code(), error = %e, "Form rejected");
            Html(result_page(&e.public_message()))
        }
    }
}

/// Page handlers
#[derive(Debug, Clone)]
pub struct PageHandlers {
    dispatcher: Arc<Dispatcher>,
}

impl PageHandlers {
    pub const fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// `GET /`
    pub async fn index() -> Html<String> {
        Html(landing_page())
    }

    /// `GET` of a form page
    pub fn form(page: FormPage) -> Html<String> {
        Html(form_page(page))
    }

    /// `POST /estimation`
    pub async fn estimation(State(handlers): State<Self>, body: FormBody) -> Html<String> {
        let result = run_flow(&handlers.dispatcher, parse_form::<ProductionRequest>(body), |d, request| {
            d.estimate(&request)
        })
        .await
        .map(|report| result_page(&estimation_report(&report)));
        render("estimation", result)
    }

    /// `POST /registration`
    pub async fn registration(State(handlers): State<Self>, body: FormBody) -> Html<String> {
        let result = run_flow(&handlers.dispatcher, parse_form::<RegistrationRequest>(body), |d, request| {
            d.register(&request)
        })
        .await
        .map(|_| result_page(REGISTRATION_SUCCESS));
        render("registration", result)
    }

    /// `POST /statistics`
    pub async fn statistics(State(handlers): State<Self>, body: FormBody) -> Html<String> {
        let result = run_flow(&handlers.dispatcher, parse_form::<CropRequest>(body), |d, request| {
            d.statistics(&request)
        })
        .await
        .map(|summary| statistics_page(&summary));
        render("statistics", result)
    }

    /// `POST /recommend`
    pub async fn recommend(State(handlers): State<Self>, body: FormBody) -> Html<String> {
        let result = run_flow(&handlers.dispatcher, parse_form::<SoilReading>(body), |d, reading| {
            let crop = d.recommend_crop(&reading)?;
            Ok(recommendation_report(&reading, &crop))
        })
        .await
        .map(|report| result_page(&report));
        render("recommend", result)
    }

    /// `POST /fertilizers`
    pub async fn fertilizers(State(handlers): State<Self>, body: FormBody) -> Html<String> {
        let result = run_flow(&handlers.dispatcher, parse_form::<FertilizerReading>(body), |d, reading| {
            let fertilizer = d.recommend_fertilizer(&reading)?;
            Ok(fertilizer_report(&reading, &fertilizer))
        })
        .await
        .map(|report| result_page(&report));
        render("fertilizers", result)
    }
}
