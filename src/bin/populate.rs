// src/bin/populate.rs
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

// --- Data structures ---

/// Demo data: state -> cities
const STATES: &[(&str, &[&str])] = &[
    ("California", &["San Francisco", "Los Angeles", "San Diego"]),
    ("Nevada", &["Las Vegas", "Reno"]),
    ("Oregon", &["Portland"]),
];

const AMENITIES: &[&str] = &["Wifi", "Pool", "Parking", "Kitchen", "Air conditioning"];

#[derive(Deserialize, Debug)]
struct Created {
    id: String,
}

#[derive(Deserialize, Debug, Default)]
struct Stats {
    #[serde(default)]
    amenities: u64,
    #[serde(default)]
    cities: u64,
    #[serde(default)]
    places: u64,
    #[serde(default)]
    reviews: u64,
    #[serde(default)]
    states: u64,
    #[serde(default)]
    users: u64,
}

#[derive(Debug, Default)]
struct SeedResult {
    created: u32,
    failed: u32,
    errors: Vec<String>,
}

// --- Seeder ---

struct Populator {
    base_url: String,
    client: Client,
    result: SeedResult,
}

impl Populator {
    fn new(base_url: String) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            base_url,
            client,
            result: SeedResult::default(),
        })
    }

    async fn check_service_status(&self) -> bool {
        match self.client.get(format!("{}/status", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// POST a JSON body and return the new object's id
    async fn create(&mut self, path: &str, body: Value) -> Option<String> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let outcome = async {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| e.to_string())?;

            if response.status().is_success() {
                response
                    .json::<Created>()
                    .await
                    .map(|c| c.id)
                    .map_err(|e| format!("Failed to parse response JSON: {}", e))
            } else {
                let status = response.status();
                let text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(format!("HTTP {} - {}", status, text))
            }
        }
        .await;

        match outcome {
            Ok(id) => {
                self.result.created += 1;
                Some(id)
            }
            Err(err) => {
                println!("{}❌ POST {}: {}{}", RED, path, err, RESET);
                self.result.failed += 1;
                self.result.errors.push(format!("POST {}: {}", path, err));
                None
            }
        }
    }

    async fn link(&mut self, place_id: &str, amenity_id: &str) {
        let url = format!(
            "{}/api/v1/places/{}/amenities/{}",
            self.base_url, place_id, amenity_id
        );
        match self.client.post(&url).send().await {
            Ok(resp) if resp.status().is_success() => self.result.created += 1,
            Ok(resp) => {
                self.result.failed += 1;
                self.result
                    .errors
                    .push(format!("link {} -> {}: HTTP {}", place_id, amenity_id, resp.status()));
            }
            Err(e) => {
                self.result.failed += 1;
                self.result.errors.push(e.to_string());
            }
        }
    }

    async fn fetch_stats(&self) -> Option<Stats> {
        let response = self
            .client
            .get(format!("{}/api/v1/stats", self.base_url))
            .send()
            .await
            .ok()?;
        response.json::<Stats>().await.ok()
    }

    async fn run(&mut self) {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_status().await {
            println!("{}❌ Service unavailable.{}", RED, RESET);
            println!("{}Please ensure hbnb-api is running (cargo run){}", YELLOW, RESET);
            process::exit(1);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);

        let start = Instant::now();
        self.print_header();

        let mut amenity_ids = Vec::new();
        for name in AMENITIES {
            if let Some(id) = self.create("/amenities", json!({ "name": name })).await {
                amenity_ids.push(id);
            }
        }

        let Some(host_id) = self
            .create(
                "/users",
                json!({
                    "email": "host@hbnb.example",
                    "password": "host-password",
                    "first_name": "Demo",
                    "last_name": "Host"
                }),
            )
            .await
        else {
            println!("{}❌ Could not create the demo host, aborting{}", RED, RESET);
            process::exit(1);
        };
        let guest_id = self
            .create(
                "/users",
                json!({ "email": "guest@hbnb.example", "password": "guest-password" }),
            )
            .await;

        for (state_name, cities) in STATES {
            println!("{}[state] {}{}", CYAN, state_name, RESET);
            let Some(state_id) = self.create("/states", json!({ "name": state_name })).await else {
                continue;
            };

            for (i, city_name) in cities.iter().enumerate() {
                let path = format!("/states/{}/cities", state_id);
                let Some(city_id) = self.create(&path, json!({ "name": city_name })).await else {
                    continue;
                };

                let path = format!("/cities/{}/places", city_id);
                let body = json!({
                    "user_id": host_id,
                    "name": format!("{} getaway", city_name),
                    "number_rooms": 1 + i as i32,
                    "number_bathrooms": 1,
                    "max_guest": 2 + 2 * i as i32,
                    "price_by_night": 80 + 40 * i as i32
                });
                let Some(place_id) = self.create(&path, body).await else {
                    continue;
                };

                for amenity_id in amenity_ids.iter().take(1 + i % amenity_ids.len().max(1)) {
                    self.link(&place_id, amenity_id).await;
                }

                if let Some(guest_id) = &guest_id {
                    let path = format!("/places/{}/reviews", place_id);
                    let body = json!({ "user_id": guest_id, "text": format!("Lovely stay in {}", city_name) });
                    self.create(&path, body).await;
                }
            }

            // Small pause to be nice
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let stats = self.fetch_stats().await.unwrap_or_default();
        self.print_summary(&stats, start.elapsed().as_secs_f64());
    }

    fn print_header(&self) {
        println!("{}╔══════════════════════════════════════════════╗{}", CYAN, RESET);
        println!("{}║   🏠  hbnb demo data populator               ║{}", CYAN, RESET);
        println!("{}╚══════════════════════════════════════════════╝{}", CYAN, RESET);
        println!(
            "\n{}📊 States to create: {} | Amenities: {}{}",
            BOLD,
            STATES.len(),
            AMENITIES.len(),
            RESET
        );
    }

    fn print_summary(&self, stats: &Stats, duration: f64) {
        println!("\n\n{}📋 Population Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────");
        println!("{:<20} {:>10}", "Type", "Stored");
        println!("──────────────────────────────────────────────");
        for (name, count) in [
            ("amenities", stats.amenities),
            ("cities", stats.cities),
            ("places", stats.places),
            ("reviews", stats.reviews),
            ("states", stats.states),
            ("users", stats.users),
        ] {
            println!("{:<20} {:>10}", name, count);
        }
        println!("──────────────────────────────────────────────");

        if self.result.failed == 0 {
            println!("\n{}✨ Process Completed Successfully{}", GREEN, RESET);
        } else {
            println!("\n{}⚠️  Completed with {} failures{}", YELLOW, self.result.failed, RESET);
            for err in &self.result.errors {
                println!("  • {}", err);
            }
        }
        println!("  • Requests succeeded: {}{}{}", GREEN, self.result.created, RESET);
        println!("  • Total Duration: {:.1}s", duration);
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let base_url = env::var("HBNB_API_URL").unwrap_or_else(|_| {
        let port = env::var("HBNB_API_PORT").unwrap_or_else(|_| "5000".to_string());
        format!("http://localhost:{}", port)
    });

    let mut populator = match Populator::new(base_url) {
        Ok(populator) => populator,
        Err(e) => {
            println!("{}❌ {}{}", RED, e, RESET);
            process::exit(1);
        }
    };
    populator.run().await;
}
