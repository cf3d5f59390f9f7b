//! `imgtier fetch` - run one request and report each delivery.

use clap::Args;
use futures::StreamExt;
use imgtier::codec::TargetSize;
use imgtier::config::ConfigFile;
use imgtier::fetch::TransportRequest;
use imgtier::logging::init_logging;
use imgtier::retrieval::{CoordinatorBuilder, FetchOptions, FetchRequest, FetchResult};
use tracing::info;

use crate::error::CliError;

/// Arguments for `imgtier fetch`.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Image key shared by every cache tier
    pub key: String,

    /// URL to GET on a cache miss or refresh
    pub url: String,

    /// Deliver at this width (requires --height)
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Deliver at this height (requires --width)
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Write the network result to the disk cache
    #[arg(long)]
    pub persist: bool,

    /// Store the result in the memory cache
    #[arg(long)]
    pub memory: bool,

    /// After a cache hit, still fetch and report a changed image
    #[arg(long)]
    pub refresh: bool,

    /// Disk cache subdirectory
    #[arg(long)]
    pub subdir: Option<String>,

    /// Save the last delivered image here (format from extension)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Extra request header as NAME:VALUE (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,
}

impl FetchArgs {
    fn to_request(&self) -> Result<FetchRequest, CliError> {
        let mut transport = TransportRequest::get(&self.url);
        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            transport = transport.with_header(name, value);
        }

        let options = FetchOptions::new()
            .persist_to_disk(self.persist)
            .populate_memory_cache(self.memory)
            .force_refresh(self.refresh);

        let mut request = FetchRequest::new(self.key.as_str(), transport).with_options(options);
        if let (Some(width), Some(height)) = (self.width, self.height) {
            request = request.with_size(TargetSize::new(width, height));
        }
        if let Some(subdir) = &self.subdir {
            request = request.with_subdirectory(subdir.as_str());
        }
        Ok(request)
    }
}

/// Split `NAME:VALUE`, trimming whitespace around both parts.
fn parse_header(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(CliError::InvalidArgument(format!(
            "header '{}' must look like NAME:VALUE",
            raw
        ))),
    }
}

/// Run `imgtier fetch`.
pub async fn run(args: FetchArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let _logging = init_logging(&config.logging.directory, &config.logging.file)
        .map_err(CliError::LoggingInit)?;

    let request = args.to_request()?;
    let coordinator = CoordinatorBuilder::from_config(&config)
        .map_err(CliError::ClientCreation)?
        .build();

    info!(key = %request.key, url = %request.transport.url, "Fetching image");

    let mut deliveries = coordinator.fetch(request);
    let mut last: Option<FetchResult> = None;
    while let Some(item) = deliveries.next().await {
        let result = item?;
        println!(
            "{:<8} {}x{}",
            result.origin,
            result.image.width(),
            result.image.height()
        );
        last = Some(result);
    }

    coordinator.log_stats();
    let stats = coordinator.stats();
    if stats.suppressed_refreshes > 0 {
        println!("network copy unchanged");
    }

    let last = last.ok_or_else(|| CliError::NothingDelivered(args.key.clone()))?;
    if let Some(path) = &args.output {
        last.image.save(path).map_err(|e| CliError::FileWrite {
            path: path.clone(),
            error: e.to_string(),
        })?;
        println!("saved {}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> FetchArgs {
        FetchArgs {
            key: "logo".into(),
            url: "https://example.com/logo.png".into(),
            width: None,
            height: None,
            persist: false,
            memory: false,
            refresh: false,
            subdir: None,
            output: None,
            headers: Vec::new(),
        }
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Authorization: Bearer abc").unwrap(),
            ("Authorization".to_string(), "Bearer abc".to_string())
        );
        assert_eq!(
            parse_header("X-Url:http://a/b").unwrap(),
            ("X-Url".to_string(), "http://a/b".to_string())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(":value").is_err());
    }

    #[test]
    fn test_request_from_flags() {
        let mut args = args();
        args.width = Some(64);
        args.height = Some(32);
        args.persist = true;
        args.refresh = true;
        args.subdir = Some("thumbs".into());
        args.headers = vec!["Accept: image/png".into()];

        let request = args.to_request().unwrap();

        assert_eq!(request.target_size, Some(TargetSize::new(64, 32)));
        assert!(request.options.persist_to_disk);
        assert!(!request.options.populate_memory_cache);
        assert!(request.options.force_refresh);
        assert_eq!(request.subdirectory(), Some("thumbs"));
        assert_eq!(request.transport.headers.len(), 1);
    }

    #[test]
    fn test_request_defaults() {
        let request = args().to_request().unwrap();

        assert_eq!(request.options, FetchOptions::default());
        assert!(request.target_size.is_none());
    }
}
