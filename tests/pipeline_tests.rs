//! End-to-end tests: CSV fixtures in, HTML charts out

use delay_atlas::core::aggregate::{filter_by_delay, infer_countries, RouteMapData};
use delay_atlas::core::chart::{
    Chart, NetworkChart, RouteMapChart, FONT_LINK, NETWORK_FILE, PLOTLY_CDN, ROUTE_MAP_FILE,
};
use delay_atlas::core::error::DataError;
use delay_atlas::core::layout::{layout_network, SpringConfig};
use delay_atlas::core::loader::{load_airports, load_flights, CoordinatePolicy};
use delay_atlas::core::models::DelayWindow;
use delay_atlas::core::network::FlightNetwork;
use delay_atlas::get_version;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FLIGHTS: &str = "\
ID,DATOP,FLTID,DEPSTN,ARRSTN,STD,STA,STATUS,AC,target,DEP_COUNTRY,ARR_COUNTRY
train_1,2016-01-03,TU 0712,TUN,CDG,2016-01-03 10:30:00,2016-01-03 12.55.00,ATA,TU 32AIMN,40,Tunisia,France
train_2,2016-01-13,TU 0757,CDG,TUN,2016-01-13 15:05:00,2016-01-13 16.55.00,ATA,TU 31BIMO,20,France,Tunisia
train_3,2016-01-16,TU 0214,TUN,CDG,2016-01-16 04:10:00,2016-01-16 06.45.00,ATA,TU 32AIMN,60,Tunisia,France
train_4,2016-01-17,TU 0480,DJE,TUN,2016-01-17 14:10:00,2016-01-17 17.00.00,ATA,TU 736IOK,18,Tunisia,Tunisia
train_5,2016-01-17,TU 0338,TUN,DJE,2016-01-17 14:10:00,2016-01-17 15.10.00,ATA,TU 736IOK,5,Tunisia,Tunisia
train_6,2016-01-17,TU 0283,TUN,XXX,2016-01-17 14:10:00,2016-01-17 15.10.00,ATA,TU 736IOK,25,Tunisia,Nowhere
train_7,2016-01-18,TU 0283,TUN,ORY,2016-01-18 14:10:00,2016-01-18 15.10.00,ATA,TU 736IOK,900,Tunisia,France
";

const AIRPORTS: &str = r#"1,"Carthage","Tunis","Tunisia","TUN","DTTA",36.851002,10.2272,22,1,"E","Africa/Tunis","airport","OurAirports"
2,"Charles de Gaulle","Paris","France","CDG","LFPG",49.012798,2.55,392,1,"E","Europe/Paris","airport","OurAirports"
3,"Djerba Zarzis","Djerba","Tunisia","DJE","DTTJ",33.875,10.7755,19,1,"E","Africa/Tunis","airport","OurAirports"
4,"Orly","Paris","France","ORY","LFPO",48.7233,2.3794,291,1,"E","Europe/Paris","airport","OurAirports"
"#;

struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().to_path_buf();
        fs::write(root.join("flights.csv"), FLIGHTS).unwrap();
        fs::write(root.join("airports.dat"), AIRPORTS).unwrap();
        Self { _dir: dir, root }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

fn assert_font_injected(page: &str) {
    assert!(page.contains(FONT_LINK));
    assert!(page.contains("font-family: 'Lexend', Arial, sans-serif !important;"));
    assert!(page.contains(PLOTLY_CDN));
}

#[test]
fn version_is_not_empty() {
    assert!(!get_version().trim().is_empty());
}

#[test]
fn test_route_map_end_to_end() {
    let fx = Fixture::new();
    let flights = load_flights(&fx.path("flights.csv")).unwrap();
    let airports = load_airports(&fx.path("airports.dat"), CoordinatePolicy::Required).unwrap();
    assert_eq!(flights.len(), 7);

    let data = RouteMapData::build(&flights, &airports, DelayWindow::DEFAULT).unwrap();

    // train_5 (5) and train_7 (900) are outside the window; train_6 has no XXX coordinates
    assert_eq!(data.summary.within_window, 5);
    assert_eq!(data.summary.joined, 4);
    let route_names: Vec<(&str, &str)> = data
        .routes
        .iter()
        .map(|r| (r.origin.as_str(), r.destination.as_str()))
        .collect();
    assert_eq!(
        route_names,
        vec![("CDG", "TUN"), ("DJE", "TUN"), ("TUN", "CDG")]
    );
    let tun_cdg = &data.routes[2];
    assert_eq!(tun_cdg.flights, 2);
    assert!((tun_cdg.mean_delay - 50.0).abs() < 1e-9);
    assert!(data.nodes.iter().all(|n| n.code != "XXX" && n.code != "ORY"));

    let tun = data.nodes.iter().find(|n| n.code == "TUN").unwrap();
    assert_eq!(tun.country, "Tunisia");

    let chart = RouteMapChart::new(&data);
    assert_eq!(chart.default_file_name(), ROUTE_MAP_FILE);
    let out = fx.path("site").join(ROUTE_MAP_FILE);
    chart.generate(&out).unwrap();

    let page = fs::read_to_string(&out).unwrap();
    assert_font_injected(&page);
    assert!(page.contains("Route: TUN → CDG<br>Flights: 2<br>Mean delay: 50.0"));
    assert!(page.contains("Airport: TUN (Tunisia)"));
}

#[test]
fn test_route_map_with_nothing_left_is_an_error() {
    let fx = Fixture::new();
    let flights = load_flights(&fx.path("flights.csv")).unwrap();
    let airports = load_airports(&fx.path("airports.dat"), CoordinatePolicy::Required).unwrap();

    let narrow = DelayWindow::new(1000.0, 2000.0);
    let err = RouteMapData::build(&flights, &airports, narrow).unwrap_err();
    assert!(matches!(err, DataError::NoRoutes { flights: 7 }));
}

#[test]
fn test_network_end_to_end() {
    let fx = Fixture::new();
    let flights = load_flights(&fx.path("flights.csv")).unwrap();
    let airports = load_airports(&fx.path("airports.dat"), CoordinatePolicy::Optional).unwrap();

    let windowed = filter_by_delay(&flights, DelayWindow::DEFAULT);
    let network = FlightNetwork::from_records(windowed.iter().copied());
    let countries = infer_countries(windowed.iter().copied());

    // XXX needs no coordinates to be part of the graph
    assert_eq!(network.node_count(), 4);
    assert_eq!(network.edge_count(), 3);
    assert_eq!(network.degree("TUN"), 3);

    let positions = layout_network(&network, &SpringConfig::default());
    let chart = NetworkChart::new(&network, &positions, &countries, &airports);
    let out = fx.path(NETWORK_FILE);
    chart.generate(&out).unwrap();

    let page = fs::read_to_string(&out).unwrap();
    assert_font_injected(&page);
    assert!(page.contains("TUN (Tunisia)<br>Carthage<br>Connections: 3"));
    assert!(page.contains("XXX (Nowhere)<br>Connections: 1"));
    assert!(page.contains("Node Connections"));
}

#[test]
fn test_network_is_reproducible() {
    let fx = Fixture::new();
    let render = |dir: &Path| {
        let flights = load_flights(&fx.path("flights.csv")).unwrap();
        let windowed = filter_by_delay(&flights, DelayWindow::DEFAULT);
        let network = FlightNetwork::from_records(windowed.iter().copied());
        let positions = layout_network(&network, &SpringConfig::default());
        let chart = NetworkChart::new(
            &network,
            &positions,
            &infer_countries(windowed.iter().copied()),
            &Default::default(),
        );
        let out = dir.join(NETWORK_FILE);
        chart.generate(&out).unwrap();
        fs::read_to_string(out).unwrap()
    };

    let first = render(&fx.path("a"));
    let second = render(&fx.path("b"));
    assert_eq!(first, second);
}

#[test]
fn test_empty_network_still_writes_chart() {
    let fx = Fixture::new();
    let flights = load_flights(&fx.path("flights.csv")).unwrap();
    let windowed = filter_by_delay(&flights, DelayWindow::new(5000.0, 6000.0));
    let network = FlightNetwork::from_records(windowed.iter().copied());
    assert!(network.is_empty());

    let positions = layout_network(&network, &SpringConfig::default());
    let chart = NetworkChart::new(
        &network,
        &positions,
        &infer_countries(windowed.iter().copied()),
        &Default::default(),
    );
    let out = fx.path(NETWORK_FILE);
    chart.generate(&out).unwrap();
    assert_font_injected(&fs::read_to_string(out).unwrap());
}

#[test]
fn test_missing_flights_file_reports_path() {
    let fx = Fixture::new();
    let err = load_flights(&fx.path("missing.csv")).unwrap_err();
    assert!(matches!(err, DataError::Io { .. }));
    assert!(err.to_string().contains("missing.csv"));
}
