use pinmap_core::{AppError, Config, Coordinate};
use pinmap_geocode::GeocodeClient;
use pinmap_viewer::{ClickListener, TracingSurface, ViewerApp};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("fatal: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Initialize core
    pinmap_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let geocoder =
        GeocodeClient::from_config(&config.geocoder).map_err(|e| AppError::Service(e.to_string()))?;

    let (clicks_tx, clicks_rx) = mpsc::unbounded_channel();
    let listener = ClickListener::channeled(clicks_tx);

    // Stand-in for the embedding widget: one click per stdin line,
    // "<lat> <lon>" or "<lat>,<lon>". EOF closes the viewer.
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_click(&line) {
                Some(position) => listener.notify(position),
                None => tracing::warn!("ignoring input line: {:?}", line.trim()),
            }
        }
        // The listener drops here, closing the click channel.
    });

    let mut app = ViewerApp::new(&config, geocoder, TracingSurface, clicks_rx);
    app.run().await;

    Ok(())
}

fn parse_click(line: &str) -> Option<Coordinate> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());

    let lat = parts.next()?.parse().ok()?;
    let lon = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(Coordinate::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_and_comma_separated_pairs() {
        assert_eq!(parse_click("35.6586 139.7454"), Some(Coordinate::new(35.6586, 139.7454)));
        assert_eq!(parse_click("35.6586,139.7454"), Some(Coordinate::new(35.6586, 139.7454)));
        assert_eq!(parse_click("  -12.5 ,  7.25 "), Some(Coordinate::new(-12.5, 7.25)));
    }

    #[test]
    fn rejects_garbage_lines() {
        assert_eq!(parse_click(""), None);
        assert_eq!(parse_click("one two"), None);
        assert_eq!(parse_click("1.0"), None);
        assert_eq!(parse_click("1.0 2.0 3.0"), None);
    }
}
