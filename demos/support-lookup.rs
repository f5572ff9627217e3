use std::env;

use error_reporter::Report;
use eyre::WrapErr as _;
use xolphin::{Client, ClientConfig, ProxyConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let username = env::var("XOLPHIN_USERNAME").wrap_err("XOLPHIN_USERNAME is not set")?;
    let password = env::var("XOLPHIN_PASSWORD").wrap_err("XOLPHIN_PASSWORD is not set")?;
    let domain = env::args().nth(1).unwrap_or_else(|| "xolphin.nl".to_owned());

    // Always use the test API here; use `.test(false)` for production.
    let mut config = ClientConfig::new(username, password).test(true);

    // Only for intercepting traffic while debugging.
    if let Some(proxy) = ProxyConfig::from_env() {
        config = config.proxy(proxy);
    }

    let client = Client::with_config(config)?;

    match client.support().product(90).await {
        Ok(product) => {
            println!(
                "{} {} ({}, {})",
                product.brand, product.name, product._type, product.validation
            );
            for price in &product.prices {
                println!("  {} year(s): {:.2}", price.years, price.price);
            }
        }
        Err(err) => eprintln!("product lookup failed: {}", Report::new(err)),
    }

    let emails = client.support().approver_email_addresses(&domain).await?;
    println!("Approver addresses for {domain}:");
    for email in emails {
        println!("  {email}");
    }

    let check = client.support().ssl_check(&domain).await?;
    println!(
        "{domain}: issued by {}, valid until {}",
        check.issuer.as_deref().unwrap_or("unknown"),
        check.valid_until.as_deref().unwrap_or("unknown"),
    );

    let rate = client.rate_state();
    println!("{} of {} calls left", rate.remaining, rate.limit);

    Ok(())
}
