use enrich_http::{CompanyProfileParams, EnrichClient, PersonProfileParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = EnrichClient::from_env().map_err(anyhow::Error::msg)?;

    let balance = client.credit_balance().await?;
    println!("balance: {balance:?}");

    let person = client
        .person_profile(PersonProfileParams::new(
            "https://www.linkedin.com/in/williamhgates",
        ))
        .await?;
    println!("person: {person:?}");

    let company = client
        .company_profile(CompanyProfileParams::new(
            "https://www.linkedin.com/company/apple",
        ))
        .await?;
    println!("company: {company:?}");

    Ok(())
}
