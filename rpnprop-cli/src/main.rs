use clap::Parser;
use rpnprop::{
    AnchorLayout, BBox, FeatureMap, ImageSize, Mode, Proposal, ProposalConfig, ProposalCreator,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Region proposal CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for each proposal stage.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Train,
    #[default]
    Eval,
}

impl From<ModeConfig> for Mode {
    fn from(value: ModeConfig) -> Self {
        match value {
            ModeConfig::Train => Mode::Train,
            ModeConfig::Eval => Mode::Eval,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum AnchorLayoutConfig {
    #[default]
    PositionMajor,
    ShapeMajor,
}

impl From<AnchorLayoutConfig> for AnchorLayout {
    fn from(value: AnchorLayoutConfig) -> Self {
        match value {
            AnchorLayoutConfig::PositionMajor => AnchorLayout::PositionMajor,
            AnchorLayoutConfig::ShapeMajor => AnchorLayout::ShapeMajor,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ProposalConfigJson {
    suppression_iou_threshold: f32,
    train_pre_budget: usize,
    train_post_budget: usize,
    eval_pre_budget: usize,
    eval_post_budget: usize,
    min_object_side: f32,
    prefer_accelerated_suppression: bool,
    anchor_layout: AnchorLayoutConfig,
}

impl Default for ProposalConfigJson {
    fn default() -> Self {
        let cfg = ProposalConfig::default();
        Self {
            suppression_iou_threshold: cfg.suppression_iou_threshold,
            train_pre_budget: cfg.train_pre_budget,
            train_post_budget: cfg.train_post_budget,
            eval_pre_budget: cfg.eval_pre_budget,
            eval_post_budget: cfg.eval_post_budget,
            min_object_side: cfg.min_object_side,
            prefer_accelerated_suppression: cfg.prefer_accelerated_suppression,
            anchor_layout: AnchorLayoutConfig::default(),
        }
    }
}

impl From<ProposalConfigJson> for ProposalConfig {
    fn from(value: ProposalConfigJson) -> Self {
        Self {
            suppression_iou_threshold: value.suppression_iou_threshold,
            train_pre_budget: value.train_pre_budget,
            train_post_budget: value.train_post_budget,
            eval_pre_budget: value.eval_pre_budget,
            eval_post_budget: value.eval_post_budget,
            min_object_side: value.min_object_side,
            prefer_accelerated_suppression: value.prefer_accelerated_suppression,
            anchor_layout: value.anchor_layout.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    output_path: Option<String>,
    mode: ModeConfig,
    proposal: ProposalConfigJson,
}

#[derive(Debug, Deserialize)]
struct MapJson {
    shape: [usize; 4],
    data: Vec<f32>,
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct Input {
    score_map: MapJson,
    delta_map: MapJson,
    anchors: Vec<[f32; 4]>,
    /// `[width, height]` after resizing.
    image_size: [f32; 2],
    #[serde(default = "default_scale")]
    scale: f32,
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    rois: Vec<[f32; 5]>,
    scores: Vec<f32>,
}

impl From<Vec<Proposal>> for Output {
    fn from(value: Vec<Proposal>) -> Self {
        let scores = value.iter().map(|p| p.score).collect();
        let rois: Vec<[f32; 5]> = value.into_iter().map(|p| p.to_roi().to_array()).collect();
        Self {
            count: rois.len(),
            rois,
            scores,
        }
    }
}

fn run(config: Config, input: Input) -> Result<Output, Box<dyn std::error::Error>> {
    let creator = ProposalCreator::new(config.proposal.into())?;
    let score_map = FeatureMap::from_shape(&input.score_map.data, input.score_map.shape)?;
    let delta_map = FeatureMap::from_shape(&input.delta_map.data, input.delta_map.shape)?;
    let anchors: Vec<BBox> = input.anchors.into_iter().map(BBox::from).collect();
    let size = ImageSize::new(input.image_size[0], input.image_size[1]);

    tracing::info!(
        anchors = anchors.len(),
        width = size.width,
        height = size.height,
        scale = input.scale,
        "generating proposals"
    );
    let proposals = creator.propose_scored(
        &score_map,
        &delta_map,
        &anchors,
        size,
        input.scale,
        config.mode.into(),
    )?;
    Ok(Output::from(proposals))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("rpnprop=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let input_text = fs::read_to_string(&config.input_path)?;
    let input: Input = serde_json::from_str(&input_text)?;
    let output_path = config.output_path.clone();
    let output = run(config, input)?;
    let json = serde_json::to_string_pretty(&output)?;

    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
