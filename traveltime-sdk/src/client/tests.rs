//! Unit tests for the batched client operations.

use super::*;
use crate::dto::geocoding::GeocodingQuery;
use crate::dto::time_map::{ArrivalSearch, DepartureSearch, Intersection, Union};
use crate::dto::{Coordinates, Rectangle, Transportation};
use crate::error::TransportError;
use crate::transport::{MockTransport, RawResponse};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use std::time::Duration;

fn time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
}

fn departure(id: &str) -> DepartureSearch {
    DepartureSearch::new(
        id,
        Coordinates::new(51.507, -0.128),
        time(),
        1800,
        Transportation::public_transport(),
    )
}

fn arrival(id: &str) -> ArrivalSearch {
    ArrivalSearch::new(
        id,
        Coordinates::new(51.507, -0.128),
        time(),
        1800,
        Transportation::Walking,
    )
}

fn departures(prefix: &str, n: usize) -> Vec<DepartureSearch> {
    (1..=n).map(|i| departure(&format!("{prefix}{i}"))).collect()
}

fn arrivals(prefix: &str, n: usize) -> Vec<ArrivalSearch> {
    (1..=n).map(|i| arrival(&format!("{prefix}{i}"))).collect()
}

/// Search ids in a batched request body, departures first.
fn search_ids(request: &ApiRequest) -> Vec<String> {
    let Some(body) = request.body.as_ref() else {
        return Vec::new();
    };
    ["departure_searches", "arrival_searches"]
        .iter()
        .flat_map(|key| body[*key].as_array().into_iter().flatten())
        .filter_map(|search| search["id"].as_str().map(str::to_string))
        .collect()
}

fn combined_ids(request: &ApiRequest) -> Vec<String> {
    let Some(body) = request.body.as_ref() else {
        return Vec::new();
    };
    ["unions", "intersections"]
        .iter()
        .flat_map(|key| body[*key].as_array().into_iter().flatten())
        .filter_map(|entry| entry["id"].as_str().map(str::to_string))
        .collect()
}

fn result_for(path: &str, id: &str) -> Value {
    match path {
        "time-map" => json!({"search_id": id, "shapes": [], "properties": {}}),
        "time-filter/postcodes" => json!({"search_id": id, "postcodes": []}),
        _ => json!({"search_id": id, "locations": [], "unreachable": []}),
    }
}

/// Answers every batched request the way the service would, with one
/// result (or feature) per search in request order, plus one per union and
/// intersection.
fn echo_body(request: &ApiRequest) -> String {
    let ids = search_ids(request);
    let body = match request.accept {
        AcceptType::GeoJson => json!({
            "type": "FeatureCollection",
            "features": ids
                .iter()
                .map(|id| json!({
                    "type": "Feature",
                    "geometry": null,
                    "properties": {"search_id": id}
                }))
                .collect::<Vec<_>>(),
        }),
        _ => {
            let results: Vec<Value> = ids
                .iter()
                .chain(combined_ids(request).iter())
                .map(|id| result_for(&request.path, id))
                .collect();
            json!({ "results": results })
        }
    };
    body.to_string()
}

fn echo_service() -> MockTransport {
    MockTransport::new(|request| Ok(RawResponse::ok(echo_body(request))))
}

/// Echo service that fails every request whose first search is `failing`.
fn failing_service(failing: &'static str) -> MockTransport {
    MockTransport::new(move |request| {
        if search_ids(request).first().map(String::as_str) == Some(failing) {
            Err(TransportError::api(500, "internal error"))
        } else {
            Ok(RawResponse::ok(echo_body(request)))
        }
    })
}

fn client(transport: &MockTransport, window: usize) -> TravelTimeClient<MockTransport> {
    let config = ClientConfig::new("app", "key").with_window_size(window);
    TravelTimeClient::with_transport(&config, transport.clone()).unwrap()
}

fn feature_ids(collection: &FeatureCollection) -> Vec<String> {
    collection
        .features
        .iter()
        .map(|f| {
            f.properties
                .as_ref()
                .and_then(|p| p.get("search_id"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

fn result_ids(response: &TimeMapResponse) -> Vec<&str> {
    response.results.iter().map(|r| r.search_id.as_str()).collect()
}

fn ids(prefix: &str, n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("{prefix}{i}")).collect()
}

#[tokio::test]
async fn one_hundred_fifty_departures_make_three_calls() {
    let transport = echo_service();
    let client = client(&transport, 50);

    let merged = client
        .time_map_geojson(departures("d", 150), vec![])
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 3);
    for request in transport.requests() {
        assert_eq!(search_ids(&request).len(), 50);
    }
    assert_eq!(feature_ids(&merged), ids("d", 150));
}

#[tokio::test]
async fn merged_features_follow_search_order_in_both_modes() {
    for mode in [DispatchMode::Sequential, DispatchMode::Concurrent] {
        let transport = echo_service();
        let client = client(&transport, 4).with_dispatch_mode(mode);

        let merged = client
            .time_map_geojson(departures("d", 6), arrivals("a", 5))
            .await
            .unwrap();

        let mut expected = ids("d", 6);
        expected.extend(ids("a", 5));
        assert_eq!(feature_ids(&merged), expected, "mode {mode:?}");
        assert_eq!(transport.call_count(), 3);
    }
}

#[tokio::test]
async fn concurrent_out_of_order_completion_keeps_search_order() {
    // The first bundle is the slowest to answer.
    let transport = echo_service().with_latency(|request| {
        if search_ids(request).first().map(String::as_str) == Some("d1") {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(1)
        }
    });
    let client = client(&transport, 2).with_dispatch_mode(DispatchMode::Concurrent);

    let merged = client.time_map_geojson(departures("d", 7), vec![]).await.unwrap();

    assert_eq!(feature_ids(&merged), ids("d", 7));
}

#[tokio::test]
async fn empty_request_makes_exactly_one_call() {
    let transport = echo_service();
    let client = client(&transport, 10);

    let merged = client.time_map_geojson(vec![], vec![]).await.unwrap();

    assert!(merged.features.is_empty());
    assert_eq!(transport.call_count(), 1);
    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["departure_searches"], json!([]));
    assert_eq!(body["arrival_searches"], json!([]));
}

#[tokio::test]
async fn small_request_is_sent_unchanged() {
    let transport = echo_service();
    let client = client(&transport, 10);
    let searches = departures("d", 3);

    client.time_map_geojson(searches.clone(), vec![]).await.unwrap();

    let expected = serde_json::to_value(TimeMapGeoJsonRequest {
        departure_searches: searches,
        arrival_searches: vec![],
    })
    .unwrap();
    assert_eq!(transport.requests()[0].body, Some(expected));
}

#[tokio::test]
async fn unions_are_copied_into_every_bundle() {
    let transport = echo_service();
    let client = client(&transport, 2);
    let options = TimeMapOptions::default()
        .with_union(Union::new("all", ["d1", "d2", "a1"]))
        .with_intersection(Intersection::new("both", ["d1", "a1"]));

    let response = client
        .time_map(departures("d", 3), arrivals("a", 1), options)
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(combined_ids(request), vec!["all", "both"]);
        assert_eq!(request.accept, AcceptType::Json);
    }
    // Each bundle reports the combined results; nothing is deduplicated.
    assert_eq!(
        result_ids(&response),
        vec!["d1", "d2", "all", "both", "d3", "a1", "all", "both"]
    );
}

#[tokio::test]
async fn sequential_failure_stops_and_reports_bundle() {
    let transport = failing_service("d5");
    let client = client(&transport, 2).with_dispatch_mode(DispatchMode::Sequential);

    let err = client
        .time_map_geojson(departures("d", 10), vec![])
        .await
        .unwrap_err();

    assert_eq!(err.bundle(), Some(2));
    assert!(matches!(err, TravelTimeError::Transport { .. }));
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn concurrent_failure_discards_successful_bundles() {
    let transport = failing_service("d5");
    let client = client(&transport, 2).with_dispatch_mode(DispatchMode::Concurrent);

    let err = client
        .time_map_geojson(departures("d", 10), vec![])
        .await
        .unwrap_err();

    assert_eq!(err.bundle(), Some(2));
    assert_eq!(transport.call_count(), 5);
}

#[tokio::test]
async fn undecodable_body_is_malformed_response() {
    let transport = MockTransport::new(|request| {
        if search_ids(request).first().map(String::as_str) == Some("d3") {
            Ok(RawResponse::ok("<html>gateway error</html>"))
        } else {
            Ok(RawResponse::ok(echo_body(request)))
        }
    });
    let client = client(&transport, 2);

    let err = client
        .time_map(departures("d", 4), vec![], TimeMapOptions::default())
        .await
        .unwrap_err();

    match err {
        TravelTimeError::MalformedResponse { bundle, body, .. } => {
            assert_eq!(bundle, 1);
            assert_eq!(body.as_deref(), Some("<html>gateway error</html>"));
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_requests_are_rejected_before_sending() {
    let transport = echo_service();
    let client = client(&transport, 2);

    let duplicate = client
        .time_map_geojson(vec![departure("x")], vec![arrival("x")])
        .await;
    assert!(matches!(
        duplicate,
        Err(TravelTimeError::InvalidConfiguration(_))
    ));

    let unknown_ref = client
        .time_map(
            departures("d", 2),
            vec![],
            TimeMapOptions::default().with_union(Union::new("u", ["d1", "d9"])),
        )
        .await;
    assert!(matches!(
        unknown_ref,
        Err(TravelTimeError::InvalidConfiguration(_))
    ));

    assert_eq!(transport.call_count(), 0);
}

#[test]
fn zero_window_is_rejected_at_construction() {
    let config = ClientConfig::new("app", "key").with_window_size(0);
    let result = TravelTimeClient::with_transport(&config, echo_service());
    assert!(matches!(
        result,
        Err(TravelTimeError::InvalidConfiguration(_))
    ));
}

#[test]
fn dispatch_mode_defaults_to_concurrent() {
    let transport = echo_service();
    assert_eq!(client(&transport, 10).dispatch_mode(), DispatchMode::Concurrent);

    let config = ClientConfig::new("app", "key").with_dispatch_mode(DispatchMode::Sequential);
    let client = TravelTimeClient::with_transport(&config, transport).unwrap();
    assert_eq!(client.dispatch_mode(), DispatchMode::Sequential);
}

#[tokio::test]
async fn time_filter_shares_locations_across_bundles() {
    let transport = echo_service();
    let client = client(&transport, 1);
    let locations = vec![
        Location::new("home", Coordinates::new(51.5, -0.1)),
        Location::new("work", Coordinates::new(51.52, -0.08)),
    ];
    let search = |id: &str| time_filter::DepartureSearch {
        id: id.to_string(),
        departure_location_id: "home".to_string(),
        arrival_location_ids: vec!["work".to_string()],
        departure_time: time(),
        travel_time: 1800,
        transportation: Transportation::public_transport(),
        properties: vec![crate::dto::Property::TravelTime],
        range: None,
    };

    let response = client
        .time_filter(locations, vec![search("s1"), search("s2")], vec![])
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.path, "time-filter");
        assert_eq!(request.body.as_ref().unwrap()["locations"].as_array().unwrap().len(), 2);
    }
    let ids: Vec<_> = response.results.iter().map(|r| r.search_id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
}

#[tokio::test]
async fn postcodes_are_merged_in_order() {
    let transport = echo_service();
    let client = client(&transport, 1);
    let search = |id: &str| postcodes::ArrivalSearch {
        id: id.to_string(),
        coords: Coordinates::new(51.5, -0.1),
        arrival_time: time(),
        travel_time: 900,
        transportation: Transportation::driving(),
        properties: vec![],
        range: None,
    };

    let response = client
        .time_filter_postcodes(vec![], vec![search("p1"), search("p2"), search("p3")])
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 3);
    assert_eq!(transport.requests()[0].path, "time-filter/postcodes");
    let ids: Vec<_> = response.results.iter().map(|r| r.search_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn geocoding_sends_query_parameters() {
    let transport = MockTransport::with_body(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-0.1276, 51.5074]},
             "properties": {"name": "London"}}
        ]}"#,
    );
    let client = client(&transport, 10);
    let query = GeocodingQuery::new("London")
        .with_limit(1)
        .within_countries(["GB"])
        .with_bounds(Rectangle::new(51.0, -1.0, 52.0, 1.0));

    let response = client.geocoding(&query).await.unwrap();

    assert_eq!(response.features.len(), 1);
    let request = &transport.requests()[0];
    assert_eq!(request.path, "geocoding/search");
    assert!(request.body.is_none());
    assert_eq!(request.query, query.to_query());
}

#[tokio::test]
async fn reverse_geocoding_sends_coordinates() {
    let transport = MockTransport::with_body(r#"{"type": "FeatureCollection", "features": []}"#);
    let client = client(&transport, 10);

    client.geocoding_reverse(51.5, -0.12, &["GB", "IE"]).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.path, "geocoding/reverse");
    assert!(request
        .query
        .contains(&("within.country".to_string(), "GB,IE".to_string())));
}

#[tokio::test]
async fn map_info_failure_is_attributed_to_the_single_call() {
    let transport = MockTransport::new(|_| Err(TransportError::api(401, "unauthorized")));
    let client = client(&transport, 10);

    let err = client.map_info().await.unwrap_err();

    assert_eq!(err.bundle(), Some(0));
    assert!(matches!(
        err,
        TravelTimeError::Transport {
            source: TransportError::Api { status: 401, .. },
            ..
        }
    ));
}

#[tokio::test]
async fn dropping_the_call_cancels_outstanding_bundles() {
    let transport = echo_service().with_latency(|_| Duration::from_secs(60));
    let client = client(&transport, 2);

    let outcome = tokio::time::timeout(
        Duration::from_millis(20),
        client.time_map_geojson(departures("d", 6), vec![]),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(transport.call_count(), 3);
    assert_eq!(transport.in_flight(), 0);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Merging split responses equals answering the whole request at once
        #[test]
        fn split_then_merge_round_trips(
            d in 0usize..40,
            a in 0usize..40,
            window in 1usize..30,
            sequential in any::<bool>(),
        ) {
            let mode = if sequential { DispatchMode::Sequential } else { DispatchMode::Concurrent };
            let windowed = echo_service();
            let whole = echo_service();

            let (split_result, whole_result) = runtime().block_on(async {
                let split = client(&windowed, window)
                    .with_dispatch_mode(mode)
                    .time_map_geojson(departures("d", d), arrivals("a", a))
                    .await
                    .unwrap();
                let unsplit = client(&whole, 100)
                    .time_map_geojson(departures("d", d), arrivals("a", a))
                    .await
                    .unwrap();
                (split, unsplit)
            });

            prop_assert_eq!(feature_ids(&split_result), feature_ids(&whole_result));
            prop_assert_eq!(windowed.call_count(), (d + a).div_ceil(window).max(1));
            prop_assert_eq!(whole.call_count(), 1);
        }
    }
}
