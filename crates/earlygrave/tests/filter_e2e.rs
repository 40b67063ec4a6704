//! End-to-end behaviour of assembled filters.

use bytes::Bytes;
use earlygrave::config::ConfigLoader;
use earlygrave::prelude::*;
use http::Method;
use http_body_util::Full;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn make_request(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn get(uri: &str) -> Request {
    make_request(Method::GET, uri)
}

/// Sets the method to HEAD, keeping URL and body.
fn method_to_head() -> FnDecorator<impl Fn(Request, Next<'_>) -> FilterResult + Send + Sync> {
    FnDecorator::new("method_to_head", |request, next| {
        let (mut parts, body) = request.into_parts();
        parts.method = Method::HEAD;
        next.run(http::Request::from_parts(parts, body))
    })
}

/// Appends `/world` to the URL, keeping method and body.
fn append_world() -> FnDecorator<impl Fn(Request, Next<'_>) -> FilterResult + Send + Sync> {
    FnDecorator::new("append_world", |request, next| {
        let (mut parts, body) = request.into_parts();
        parts.uri = format!("{}/world", parts.uri).parse().unwrap();
        next.run(http::Request::from_parts(parts, body))
    })
}

fn standard_filter() -> Filter {
    filter![
        pagination_validator(),
        pagination_extractor(Pagination::new("30", "0")),
        sort_validator(["name", "role"]),
        sort_extractor(Sort::new("name", SortDirection::Desc)),
        choice_validator("currency", ["USD", "NIS"]),
    ]
}

#[test]
fn decorators_apply_in_listed_order() {
    let filter = filter![append_world(), method_to_head()];

    let request = filter.apply(get("/hello")).unwrap();

    assert_eq!(request.uri(), "/hello/world");
    assert_eq!(request.method(), Method::HEAD);
}

#[test]
fn failing_extractor_surfaces_its_error() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = counter.clone();

    let filter = filter![
        extract_param(|request| Err(Rejection::new(request, FilterError::extraction("Oops!")))),
        FnDecorator::new("after", move |request, next| {
            seen.fetch_add(1, Ordering::SeqCst);
            next.run(request)
        }),
    ];

    let rejection = filter.apply(get("/")).unwrap_err();

    assert_eq!(rejection.error().to_string(), "extraction failed: Oops!");
    assert_eq!(rejection.error().error_code(), "EXTRACTION_FAILED");
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn extractor_passes_anyhow_error_through() {
    let filter = filter![extract_param(|request| {
        let err = anyhow::anyhow!("tenant lookup failed").context("resolving tenant");
        Err(Rejection::new(request, err))
    })];

    let err = filter.apply(get("/")).unwrap_err().into_error();
    assert!(matches!(err, FilterError::Extraction(_)));
    assert_eq!(err.to_string(), "extraction failed: resolving tenant");
}

#[test]
fn standard_pipeline_extracts_everything() {
    let request = standard_filter()
        .apply(get("/users?offset=3&limit=34&sort=-role&currency=USD"))
        .unwrap();

    assert_eq!(request.pagination().unwrap(), &Pagination::new("34", "3"));
    assert_eq!(request.sort().unwrap(), &Sort::new("role", SortDirection::Desc));
    assert_eq!(request.uri(), "/users?offset=3&limit=34&sort=-role&currency=USD");
}

#[test]
fn standard_pipeline_applies_defaults() {
    let request = standard_filter().apply(get("/users")).unwrap();

    assert_eq!(get_pagination_context(&request).unwrap(), &Pagination::new("30", "0"));
    assert_eq!(get_sort_context(&request).unwrap(), &Sort::new("name", SortDirection::Desc));
}

#[test]
fn standard_pipeline_rejections() {
    let cases = [
        ("/users?limit=s200", "INVALID_PARAMETER_FORMAT"),
        ("/users?offset=blabla", "INVALID_PARAMETER_FORMAT"),
        ("/users?sort=rank", "INVALID_SORT_COLUMN"),
        ("/users?sort=-rank", "INVALID_SORT_COLUMN"),
        ("/users?currency=BLA", "INVALID_CHOICE"),
    ];

    for (uri, code) in cases {
        let rejection = standard_filter().apply(get(uri)).unwrap_err();
        assert_eq!(rejection.error().error_code(), code, "for {uri}");
    }

    let rejection = standard_filter().apply(get("/users?sort=-rank")).unwrap_err();
    assert_eq!(rejection.to_string(), "rank is not sortable");

    let rejection = standard_filter().apply(get("/users?currency=BLA")).unwrap_err();
    assert_eq!(rejection.to_string(), "BLA is an invalid option for currency");
}

#[test]
fn first_failure_wins() {
    // Both pagination and sort are bad; pagination runs first.
    let rejection = standard_filter()
        .apply(get("/users?limit=abc&sort=rank"))
        .unwrap_err();

    assert!(matches!(rejection.error(), FilterError::ParameterFormat { .. }));
}

#[test]
fn late_rejection_carries_earlier_extractions() {
    let rejection = standard_filter()
        .apply(get("/users?limit=5&currency=EUR"))
        .unwrap_err();

    // Choice validation runs after both extractors.
    assert_eq!(rejection.request().pagination().unwrap(), &Pagination::new("5", "0"));
    assert!(rejection.request().sort().is_ok());
}

#[test]
fn accessors_without_extraction_report_context_not_found() {
    let filter = filter![pagination_validator(), sort_validator(["name"])];
    let request = filter.apply(get("/?limit=10&sort=name")).unwrap();

    let err = get_pagination_context(&request).unwrap_err();
    assert!(err.is_context_not_found());
    assert!(matches!(err, FilterError::ContextNotFound { kind: ContextKind::Pagination }));

    let err = request.sort().unwrap_err();
    assert!(matches!(err, FilterError::ContextNotFound { kind: ContextKind::Sort }));
    assert_eq!(err.error_code(), "CONTEXT_NOT_FOUND");
}

#[test]
fn validators_leave_the_request_alone() {
    let filter = filter![
        pagination_validator(),
        sort_validator(["name"]),
        choice_validator("currency", ["USD"]),
    ];

    let request = filter.apply(make_request(Method::PATCH, "/a?limit=1&sort=name&currency=USD")).unwrap();
    assert_eq!(request.method(), Method::PATCH);
    assert_eq!(request.uri(), "/a?limit=1&sort=name&currency=USD");
    assert!(request.extensions().is_empty());
}

#[test]
fn configured_filter_matches_handwritten_one() {
    let config = ConfigLoader::new()
        .with_string(
            r#"
                [sort]
                enabled = true
                columns = ["name", "role"]
                default_column = "name"
                default_direction = "DESC"

                [[choices]]
                parameter = "currency"
                options = ["USD", "NIS"]
            "#,
            "toml",
        )
        .unwrap()
        .load()
        .unwrap();

    let configured = config.build_filter();
    let handwritten = standard_filter();
    assert_eq!(configured.step_names(), handwritten.step_names());

    for uri in ["/", "/?limit=7&sort=role", "/?sort=-name&currency=NIS"] {
        let a = configured.apply(get(uri)).unwrap();
        let b = handwritten.apply(get(uri)).unwrap();
        assert_eq!(a.pagination().unwrap(), b.pagination().unwrap(), "for {uri}");
        assert_eq!(a.sort().unwrap(), b.sort().unwrap(), "for {uri}");
    }
}

#[test]
fn shared_filter_serves_many_threads() {
    let filter = standard_filter();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let filter = filter.clone();
            std::thread::spawn(move || {
                let uri = format!("/users?limit={i}&offset={}", i * 10);
                let request = filter.apply(get(&uri)).unwrap();
                assert_eq!(
                    request.pagination().unwrap(),
                    &Pagination::new(i.to_string(), (i * 10).to_string())
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

proptest! {
    #[test]
    fn prop_rerunning_extraction_is_stable(
        limit in 1u16..1000,
        offset in 0u16..1000,
        column in prop::sample::select(vec!["name", "role"]),
        descending in any::<bool>(),
    ) {
        let marker = if descending { "-" } else { "" };
        let uri = format!("/?limit={limit}&offset={offset}&sort={marker}{column}");
        let filter = standard_filter();

        let once = filter.apply(get(&uri)).unwrap();
        let pagination = once.pagination().unwrap().clone();
        let sort = once.sort().unwrap().clone();

        let twice = filter.apply(once).unwrap();
        prop_assert_eq!(twice.pagination().unwrap(), &pagination);
        prop_assert_eq!(twice.sort().unwrap(), &sort);
    }
}
