//! Interactive console for the ERC-20 session
//!
//! Run with: cargo run --example interactive
//!
//! Requires TOKEN_RPC_URL. Signs with PRIVATE_KEY when set, otherwise asks the
//! endpoint's own wallet for account access.

use std::io::{self, Write};

use erc20_session::{
    format_token_amount, LocalWallet, RpcTokenReader, RpcWallet, SessionConfig, TokenSession,
    WalletProvider,
};

type Session<W> = TokenSession<RpcTokenReader, W>;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = SessionConfig::from_env()?;

    match std::env::var("PRIVATE_KEY") {
        Ok(private_key) => {
            let wallet = LocalWallet::from_private_key(&private_key, &config.rpc_url)?;
            run(TokenSession::connect(wallet, config)?).await
        }
        Err(_) => {
            let wallet = RpcWallet::new(&config.rpc_url)?;
            run(TokenSession::connect(wallet, config)?).await
        }
    }
}

async fn run<W: WalletProvider>(session: Session<W>) -> eyre::Result<()> {
    println!("\n========================================");
    println!("        ERC-20 Token Console");
    println!("========================================");
    println!("RPC: {}", session.config().rpc_url);

    if let Some(token) = session.config().token {
        // Errors are kept in the session state and shown below
        let _ = session.load_contract(&token.to_string()).await;
    }

    // Main loop
    loop {
        print_summary(&session).await;

        println!("\n----------------------------------------");
        println!("Select an option:");
        println!("  1. Load token contract");
        println!("  2. Get my balance");
        println!("  3. Mint tokens");
        println!("  4. Burn tokens");
        println!("  5. Transfer tokens");
        println!("  6. Pause");
        println!("  7. Unpause");
        println!("  8. Show transfer events");
        println!("  9. Dump session state (JSON)");
        println!("  q. Quit");
        println!("----------------------------------------");

        let choice = prompt("Enter choice: ")?;

        // Failed actions are recorded in the session and printed with the summary
        match choice.as_str() {
            "1" => {
                let address = prompt("ERC20 contract address: ")?;
                let _ = session.load_contract(&address).await;
            }
            "2" => {
                let _ = session.get_my_balance().await;
            }
            "3" => {
                let value = prompt("Amount to mint (base units): ")?;
                report(session.mint(&value).await);
            }
            "4" => {
                let value = prompt("Amount to burn (base units): ")?;
                report(session.burn(&value).await);
            }
            "5" => {
                let recipient = prompt("Recipient address: ")?;
                let amount = prompt("Amount to transfer: ")?;
                report(session.transfer(&recipient, &amount).await);
            }
            "6" => report(session.pause().await),
            "7" => report(session.unpause().await),
            "8" => print_transfers(&session).await,
            "9" => {
                let state = session.state().await;
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            "q" | "Q" => {
                println!("\nGoodbye!");
                break;
            }
            _ => println!("\nInvalid choice. Please try again."),
        }
    }

    Ok(())
}

fn prompt(label: &str) -> eyre::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn report(result: eyre::Result<alloy::primitives::TxHash>) {
    if let Ok(tx_hash) = result {
        println!("Transaction: {}", tx_hash);
    }
}

/// Contract, balance and last error
async fn print_summary<W: WalletProvider>(session: &Session<W>) {
    let state = session.state().await;
    let [address, name, symbol, supply] = state.contract_row();
    let [holder, balance] = state.balance_row();

    println!("\n=== Token ===");
    println!("  Address: {}", address);
    println!("  Name:    {}", name);
    println!("  Symbol:  {}", symbol);
    println!("  Supply:  {}", supply);
    println!("=== Balance ===");
    println!("  Account: {}", holder);
    println!("  Balance: {}", balance);

    if let Some(b) = state.balance() {
        let decimals = session.config().token_decimals;
        println!("           ({} tokens)", format_token_amount(b.balance, decimals));
    }

    if let Some(err) = state.error() {
        println!("\n!! {}", err);
    }
}

/// Print received transfers in a formatted table
async fn print_transfers<W: WalletProvider>(session: &Session<W>) {
    let state = session.state().await;

    match state.listening() {
        Some(token) => println!("\nListening on {}", token),
        None => println!("\nNot listening (load a contract first)"),
    }

    if state.transfers().is_empty() {
        println!("No transfers received.");
        return;
    }

    println!("\n{:<68} {:<44} {:<44} {}", "Tx Hash", "From", "To", "Amount");
    println!("{}", "-".repeat(180));

    for event in state.transfers() {
        let tx_hash = event
            .tx_hash
            .map(|h| h.to_string())
            .unwrap_or_else(|| "(pending)".to_string());
        println!("{:<68} {:<44} {:<44} {}", tx_hash, event.from, event.to, event.amount);
    }
}
