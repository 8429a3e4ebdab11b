use enrich_http::{run_bulk, EnrichClient, PersonProfileParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = EnrichClient::from_env().map_err(anyhow::Error::msg)?;

    // One profile URL per line on stdin, e.g. `cargo run --example bulk < urls.txt`.
    let urls: Vec<String> = std::io::stdin()
        .lines()
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect();

    let ops = urls
        .iter()
        .map(|url| client.person_profile(PersonProfileParams::new(url.clone())));
    let outcomes = run_bulk(ops, client.options().max_workers).await;

    for (url, outcome) in urls.iter().zip(outcomes) {
        match outcome {
            Ok(person) => println!("{url}: ok ({})", if person.is_typed() { "typed" } else { "raw" }),
            Err(err) => eprintln!("{url}: {err}"),
        }
    }

    Ok(())
}
