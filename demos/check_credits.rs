use std::io;

use sms24x::{AuthContext, Sms24xClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = std::env::var("SMS24X_USERNAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS24X_USERNAME environment variable is required",
        )
    })?;
    let password = std::env::var("SMS24X_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMS24X_PASSWORD environment variable is required",
        )
    })?;

    let auth = AuthContext::new(username, password)?;
    let client = Sms24xClient::builder()
        .default_auth(auth)
        .check_credentials(true)
        .build()
        .await?;

    let credits = client.available_credits(None).await?;
    println!("credits available: {credits}");

    Ok(())
}
