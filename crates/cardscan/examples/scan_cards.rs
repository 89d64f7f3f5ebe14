//! Scan a photo of laid-out playing cards and save each rectified card.
//!
//! Usage: `scan_cards <image> [config.json]`

use cardscan::detector::ScanReport;
use cardscan::{detect, ScanConfig};
use image::ImageReader;
use log::info;
use std::{fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    cardscan::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    cardscan::core::init_with_level(log::LevelFilter::Info)?;

    let mut args = std::env::args().skip(1);
    let Some(image_path) = args.next() else {
        eprintln!("Usage: scan_cards <image> [config.json]");
        return Ok(());
    };
    let mut cfg = match args.next() {
        Some(path) => ScanConfig::load_json(path)?,
        None => ScanConfig::default(),
    };
    cfg.image_path = image_path;

    let img = ImageReader::open(&cfg.image_path)?.decode()?;
    let params = cfg.build_params();
    let result = detect::scan_image(&img, &params)?;
    info!("{} card(s); stats: {:?}", result.len(), result.stats);

    let out_dir = cfg.output_dir();
    fs::create_dir_all(&out_dir)?;
    let mut report = ScanReport::new(&cfg.image_path, &params, &result);
    for (card, entry) in result.cards.iter().zip(report.cards.iter_mut()) {
        let path: PathBuf = out_dir.join(format!("card_{:02}.png", entry.index));
        card.image.save(&path)?;
        entry.path = Some(path.display().to_string());
    }
    report.write_json(cfg.report_path())?;
    info!("report written to {}", cfg.report_path().display());

    Ok(())
}
