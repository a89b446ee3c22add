// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::env;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use omi_node::config::{load_and_validate_config, RuntimeBuilder};
use omi_node::odf::factory::{
    create_description, create_immutable_odf, create_info_item, create_value,
};
use omi_node::odf::{Description, Node, QlmId, Value};
use omi_node::omi::{CallRequest, ReadRequest, ResponseRequest, WriteRequest};
use omi_node::traits::Odf;

const DEFAULT_CONFIG: &str = "configs/demo.yaml";
const HUMIDITY_PATH: &str = "Objects/House/LivingRoom/humidity";
const TEMPERATURE_PATH: &str = "Objects/House/LivingRoom/temperature";
const ECHO_PATH: &str = "Objects/Echo/ping";

/// Leaf node at `path`, named after its last segment.
fn info_item(
    path: &str,
    descriptions: Vec<Description>,
    values: Vec<Value>,
) -> anyhow::Result<Node> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let item = create_info_item(
        name,
        path,
        None,
        Vec::<QlmId>::new(),
        descriptions,
        values,
        None,
        HashMap::new(),
    )?;
    Ok(Node::from(item))
}

fn print_response(title: &str, response: &ResponseRequest) -> anyhow::Result<()> {
    let status = if response.is_success() { "✅" } else { "❌" };
    println!("\n{} {} ({} results)", status, title, response.results.len());
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "omi_node=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let start_time = Instant::now();

    println!("🚀 O-MI Node");
    println!("═══════════════════════════════════");
    println!("📋 Configuration: {}", config_file);

    let config = load_and_validate_config(&config_file)
        .with_context(|| format!("loading {}", config_file))?;
    println!("⏱️  Agent timeout: {:?}", config.agent_system.timeout());
    println!("🗄️  History length: {}", config.agent_system.history_length());

    let system = RuntimeBuilder::from_config(&config).await?;
    println!("\n🤖 Agents:");
    for (i, agent) in system.agents().iter().enumerate() {
        let capability = if agent.is_responsible() { "responsible" } else { "internal" };
        println!("  {}. {} ({})", i + 1, agent.name(), capability);
    }

    let requests = system.request_handle();

    let humidity = info_item(
        HUMIDITY_PATH,
        vec![create_description("Relative humidity", Some("en"))],
        vec![create_value("41.5", "xs:double", Utc::now(), HashMap::new())],
    )?;
    let write = WriteRequest::new(create_immutable_odf(vec![humidity])?);
    print_response("Write", &requests.write(write).await?)?;

    let ping = info_item(
        ECHO_PATH,
        Vec::new(),
        vec![create_value("hello", "xs:string", Utc::now(), HashMap::new())],
    )?;
    let call = CallRequest::new(create_immutable_odf(vec![ping])?);
    print_response("Call", &requests.call(call).await?)?;

    // Give the publisher a tick or two before reading back.
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let query = create_immutable_odf(vec![
        info_item(HUMIDITY_PATH, Vec::new(), Vec::new())?,
        info_item(TEMPERATURE_PATH, Vec::new(), Vec::new())?,
    ])?;
    let read = ReadRequest::new(query).with_newest(5);
    let response = requests.read(read).await?;
    print_response("Read", &response)?;

    let combined = response.combined_odf()?;
    println!("\n🌳 Stored paths:");
    for path in combined.paths() {
        println!("  • {}", path);
    }

    system.shutdown().await?;

    println!("\n⏱️  Total Time (including config load): {:?}", start_time.elapsed());
    Ok(())
}
