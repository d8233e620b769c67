use std::sync::Arc;

use clap::{Parser, Subcommand};
use foundation::LatLng;
use layers::{DownloadFormat, GeologyFilter, LayerDownload, LayerId, LayerVisibility};
use runtime::{LoadingIndicator, NoticeBus};
use scene::SelectionLayer;
use services::{FeatureService, HttpFeatureService, HttpGeocoder, http_client};
use tools::{format_notice, format_table, parse_ring};
use tracing_subscriber::EnvFilter;
use viewer::{SelectionEngine, Session, ViewerConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the geological survey GeoServer from a terminal")]
struct Args {
    /// WFS endpoint (default: GEOSERVER_WFS_URL or the local GeoServer)
    #[arg(long)]
    wfs_url: Option<String>,

    /// Geocoder search endpoint (default: GEOCODER_URL or Nominatim)
    #[arg(long)]
    geocoder_url: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select features around a point
    SelectPoint {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Feature type to query
        #[arg(long)]
        type_name: Option<String>,
    },

    /// Select features inside a polygon given as "lat,lng;lat,lng;..."
    SelectPolygon {
        #[arg(long, allow_hyphen_values = true)]
        ring: String,
        #[arg(long)]
        type_name: Option<String>,
    },

    /// Search for a place inside Namibia
    Search { query: String },

    /// Print the legend for a set of visible layers
    Legend {
        /// Comma-separated layer ids
        #[arg(long, default_value = "")]
        layers: String,
        #[arg(long, default_value = "all")]
        geology: String,
    },

    /// Print the WFS URL of a whole-layer export
    DownloadUrl { layer: String, format: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ViewerConfig::from_env();
    if let Some(url) = args.wfs_url {
        config.wfs_url = url;
    }
    if let Some(url) = args.geocoder_url {
        config.geocoder_url = url;
    }

    tracing::debug!(wfs = %config.wfs_url, geocoder = %config.geocoder_url, "service endpoints");
    let http = http_client(config.request_timeout)?;
    let features = Arc::new(HttpFeatureService::new(http.clone(), config.wfs_url.clone()));

    match args.command {
        Command::SelectPoint {
            lat,
            lng,
            type_name,
        } => {
            let engine = engine(&config, features, type_name);
            let mut notices = NoticeBus::new();
            let layer = engine
                .select_by_point(LatLng::new(lat, lng), &mut notices)
                .await;
            print_selection(&layer, &notices, args.json)?;
        }
        Command::SelectPolygon { ring, type_name } => {
            let ring = parse_ring(&ring)?;
            let engine = engine(&config, features, type_name);
            let mut notices = NoticeBus::new();
            let layer = engine.select_by_polygon(ring, &mut notices).await;
            print_selection(&layer, &notices, args.json)?;
        }
        Command::Search { query } => {
            let geocoder = Arc::new(HttpGeocoder::new(http, config.geocoder_url.clone()));
            let mut session = Session::new(&config, features, geocoder);
            let places = session.search(&query).await.to_vec();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&places)?);
            } else {
                for p in &places {
                    println!("{}\t{:.6}\t{:.6}", p.display_name, p.lat, p.lon);
                }
            }
            for n in session.notices() {
                eprintln!("{}", format_notice(n));
            }
        }
        Command::Legend {
            layers: names,
            geology,
        } => {
            let mut visibility = LayerVisibility::default();
            for name in names.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                visibility.set(name.parse::<LayerId>()?, true);
            }
            let filter: GeologyFilter = geology.parse()?;
            let legend = layers::legend::render(&visibility, filter);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&legend)?);
            } else if !legend.is_visible() {
                eprintln!("legend hidden: no visible layers");
            } else {
                for e in &legend.entries {
                    println!("{}\t{}", e.color, e.label);
                }
            }
        }
        Command::DownloadUrl { layer, format } => {
            let download = LayerDownload::new(layer.parse()?, format.parse::<DownloadFormat>()?);
            println!("{}", features.request_url(&download.request()));
            eprintln!("save as {}", download.file_name());
        }
    }

    Ok(())
}

fn engine(
    config: &ViewerConfig,
    features: Arc<HttpFeatureService>,
    type_name: Option<String>,
) -> SelectionEngine {
    SelectionEngine::new(
        features,
        type_name.unwrap_or_else(|| config.selection_type_name.clone()),
        LoadingIndicator::new(),
    )
}

fn print_selection(
    layer: &SelectionLayer,
    notices: &NoticeBus,
    json: bool,
) -> Result<(), serde_json::Error> {
    for n in notices.notices() {
        eprintln!("{}", format_notice(n));
    }
    let table = layer.attribute_table();
    if json {
        let out = serde_json::json!({
            "summary": layer.summary(),
            "markers": layer.markers,
            "attributes": table,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", layer.summary());
        print!("{}", format_table(&table));
    }
    Ok(())
}
