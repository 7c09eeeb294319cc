//! Message routing topology example.
//!
//! Builds a small publish/subscribe service topology, watches the change
//! feed while mutating it, and cascades a service removal.

use kvgraph::{ChangeRecord, Edge, Graph, GraphConfig, GraphError, MemoryStore};
use serde_json::json;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> kvgraph::Result<()> {
    let store = MemoryStore::new();
    let mut feed = store.subscribe("graph:changes");
    let graph = Graph::new(Arc::new(store.clone()), GraphConfig::default());

    println!("Building a message routing topology...\n");

    // orders fans out to billing and shipping; both report into audit.
    graph
        .force_create_edge(Edge::new("orders", "billing", json!({"topic": "order.created"})))
        .await?;
    graph
        .force_create_edge(Edge::new("orders", "shipping", json!({"topic": "order.created"})))
        .await?;
    graph
        .force_create_edge(Edge::new("billing", "audit", json!({"topic": "invoice.issued"})))
        .await?;
    graph
        .force_create_edge(Edge::new("shipping", "audit", json!({"topic": "parcel.sent"})))
        .await?;
    println!("✓ Created 4 routes across 4 services");

    println!("\n--- Topology ---\n");

    let downstream = graph.get_from("orders").await?;
    println!("orders feeds {} subscribers:", downstream.len());
    for edge in &downstream {
        println!("  - {} ({})", edge.sid, edge.data["topic"].as_str().unwrap_or("?"));
    }

    let upstream = graph.get_to("audit").await?;
    println!("\naudit hears from {} publishers:", upstream.len());
    for edge in &upstream {
        println!("  - {} ({})", edge.pid, edge.data["topic"].as_str().unwrap_or("?"));
    }

    let billing_routes = graph.get_all("billing").await?;
    println!("\nbilling touches {} routes in total", billing_routes.len());

    println!("\n--- Mutations ---\n");

    graph
        .update_edge(Edge::new(
            "billing",
            "audit",
            json!({"topic": "invoice.issued", "retries": 3}),
        ))
        .await?;
    println!("✓ Updated the billing -> audit route");

    let destroyed = graph.destroy_node("audit").await?;
    println!("✓ Destroyed audit, cascading {} routes away", destroyed.len());

    // Everything above also went out on the change feed; each message is a
    // JSON array of {before, after} records.
    println!("\n--- Change feed ---\n");
    while let Ok(message) = feed.try_recv() {
        let records: Vec<ChangeRecord> = serde_json::from_str(&message)
            .map_err(|e| GraphError::serialization("Failed to parse change records", Some(e)))?;
        for record in records {
            match (record.before, record.after) {
                (None, Some(after)) => println!("  created   {} -> {}", after.pid, after.sid),
                (Some(before), Some(_)) => println!("  updated   {} -> {}", before.pid, before.sid),
                (Some(before), None) => println!("  destroyed {} -> {}", before.pid, before.sid),
                (None, None) => {}
            }
        }
    }

    println!("\n--- Statistics ---");
    println!("Routes still leaving orders: {}", graph.get_from("orders").await?.len());
    println!("Store keys left: {}", store.len());

    Ok(())
}
