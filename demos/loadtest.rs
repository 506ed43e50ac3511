//! Load generator for a running coupon service.
//!
//! For each iteration: create a coupon under a random code, fetch it back,
//! then apply it to a basket worth 30..70.
//!
//! ```text
//! cargo run --example loadtest -- 1000
//! COUPON_URL=http://10.0.0.5:8080 cargo run --example loadtest -- 50
//! ```

use std::time::Instant;

use coupon_service::http::{ApplyRequest, CouponsRequest, CreateRequest};
use coupon_service::Basket;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let requests: usize = std::env::args()
        .nth(1)
        .ok_or("usage: loadtest <number-of-requests>")?
        .parse()?;
    let base = std::env::var("COUPON_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let client = reqwest::Client::new();

    let started = Instant::now();
    let mut failures = 0usize;

    for _ in 0..requests {
        let seed = Uuid::new_v4();
        let code = seed.simple().to_string()[..10].to_string();
        let basket_value = 30 + i64::from(seed.as_bytes()[15] % 40);

        let create = client
            .post(format!("{base}/api/create"))
            .json(&CreateRequest {
                discount: 10,
                code: code.clone(),
                min_basket_value: 50,
            })
            .send()
            .await?;
        failures += usize::from(!create.status().is_success());
        println!("{}", create.text().await?);

        let coupons = client
            .get(format!("{base}/api/coupons"))
            .json(&CouponsRequest {
                codes: vec![code.clone()],
            })
            .send()
            .await?;
        failures += usize::from(!coupons.status().is_success());
        println!("{}", coupons.text().await?);

        // Baskets under the 50 minimum get a 400; only 5xx counts as a failure.
        let apply = client
            .post(format!("{base}/api/apply"))
            .json(&ApplyRequest {
                basket: Basket::with_value(basket_value),
                code,
            })
            .send()
            .await?;
        failures += usize::from(apply.status().is_server_error());
        println!("{}", apply.text().await?);
    }

    let elapsed = started.elapsed();
    println!(
        "{} iterations ({} requests) in {:?}, {} failed",
        requests,
        requests * 3,
        elapsed,
        failures
    );
    Ok(())
}
