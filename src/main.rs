use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use yuntu::cli::{Cli, Commands, ConfigAction, InputArgs};
use yuntu::config::{Config, ConfigValidator};
use yuntu::error::{Result, YuntuError};
use yuntu::layout::{ScaleKind, SpiralKind};
use yuntu::pipeline::{CloudPipeline, GenerateRequest};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Generate {
            input,
            width,
            height,
            seed,
            spiral,
            scale,
            rotation_steps,
            output,
            compact,
        } => {
            let overrides = LayoutOverrides {
                width,
                height,
                spiral,
                scale,
                rotation_steps,
            };
            cmd_generate(cli.config, input, overrides, seed, output, compact)?;
        }
        Commands::Words { input, limit, json } => {
            cmd_words(cli.config, input, limit, json)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "yuntu=debug" } else { "yuntu=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Layout flags that override the configuration
struct LayoutOverrides {
    width: Option<f64>,
    height: Option<f64>,
    spiral: Option<SpiralKind>,
    scale: Option<ScaleKind>,
    rotation_steps: Option<u32>,
}

impl LayoutOverrides {
    fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
        if let Some(spiral) = self.spiral {
            config.layout.spiral = spiral;
        }
        if let Some(scale) = self.scale {
            config.layout.scale = scale;
        }
        if let Some(steps) = self.rotation_steps {
            config.layout.rotation_steps = steps;
        }
    }
}

fn cmd_generate(
    config_path: Option<PathBuf>,
    input: InputArgs,
    overrides: LayoutOverrides,
    seed: Option<u64>,
    output: Option<PathBuf>,
    compact: bool,
) -> Result<()> {
    let mut config = load_config(config_path, &input)?;
    overrides.apply(&mut config);
    ConfigValidator::validate(&config)?;

    let mut request = build_request(&input)?;
    request.seed = seed;

    let pipeline = CloudPipeline::new(config)?;
    let cloud = pipeline.generate(&request)?;
    let layout = &cloud.layout;

    if !layout.is_complete() {
        tracing::warn!(
            "Canvas is full: {} of {} words dropped",
            layout.dropped_count(),
            layout.placed_count() + layout.dropped_count()
        );
    }

    let json = if compact {
        serde_json::to_string(layout)
    } else {
        serde_json::to_string_pretty(layout)
    }
    .map_err(|e| YuntuError::Json {
        source: e,
        context: "Failed to serialize layout".to_string(),
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, json).map_err(|e| YuntuError::Io {
                source: e,
                context: format!("Failed to write layout: {:?}", path),
            })?;
            println!(
                "✓ Placed {} words ({} dropped) -> {}",
                layout.placed_count(),
                layout.dropped_count(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_words(
    config_path: Option<PathBuf>,
    input: InputArgs,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, &input)?;
    let request = build_request(&input)?;

    let pipeline = CloudPipeline::new(config)?;
    let mut words = pipeline.rank(&request)?;
    if let Some(limit) = limit {
        words.truncate(limit);
    }

    if json {
        let json = serde_json::to_string_pretty(&words).map_err(|e| YuntuError::Json {
            source: e,
            context: "Failed to serialize word list".to_string(),
        })?;
        println!("{}", json);
        return Ok(());
    }

    println!("Ranked words: {}", words.len());
    println!("=============");
    for (rank, word) in words.iter().enumerate() {
        println!("{:>4}  {:<24} {}", rank + 1, word.text, word.value);
    }

    Ok(())
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, &InputArgs::default())?;
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
        ConfigAction::Validate { file } => {
            let path = resolve_config_path(file.or(config_path))?;
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
            println!("  Extraction mode: {}", config.extraction.mode);
            if !config.profiles.is_empty() {
                let mut names: Vec<&String> = config.profiles.keys().collect();
                names.sort();
                println!("  Profiles: {:?}", names);
            }
        }
        ConfigAction::Init { force } => {
            let path = resolve_config_path(config_path)?;

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            let config = Config::default();
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn resolve_config_path(config_path: Option<PathBuf>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path),
        None => Config::default_path(),
    }
}

/// Load the config file (or defaults), then apply profile and mode from the input flags
fn load_config(config_path: Option<PathBuf>, input: &InputArgs) -> Result<Config> {
    let path = resolve_config_path(config_path)?;

    let mut config = if path.exists() {
        Config::load(&path)?
    } else {
        tracing::debug!(
            "Config file not found at {}, using defaults. Run 'yuntu config init' to create one.",
            path.display()
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Some(profile) = &input.profile {
        config.apply_profile(profile)?;
    }
    if let Some(mode) = input.mode {
        config.extraction.mode = mode;
    }

    ConfigValidator::validate(&config)?;
    Ok(config)
}

fn build_request(input: &InputArgs) -> Result<GenerateRequest> {
    let text = read_source_text(input)?;
    Ok(GenerateRequest::new(text)
        .exclude(input.exclude.clone())
        .include(input.include.clone()))
}

fn read_source_text(input: &InputArgs) -> Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }

    match input.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).map_err(|e| YuntuError::Io {
                source: e,
                context: format!("Failed to read input file: {:?}", path),
            })
        }
        explicit => {
            let stdin = std::io::stdin();
            // Bare invocation on a terminal means inclusions only
            if explicit.is_none() && stdin.is_terminal() {
                return Ok(String::new());
            }
            let mut text = String::new();
            stdin.lock().read_to_string(&mut text).map_err(|e| YuntuError::Io {
                source: e,
                context: "Failed to read stdin".to_string(),
            })?;
            Ok(text)
        }
    }
}
