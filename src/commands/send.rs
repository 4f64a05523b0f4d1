use std::sync::Arc;

use crate::app::App;
use crate::models::TransferOutcome;

pub async fn execute(app: &Arc<App>, args: &[&str]) -> Result<(), String> {
    app.require_dashboard()?;

    let [receiver_email, amount] = args else {
        return Err("Usage: `send <email> <amount>`, e.g. `send friend@example.com 250.50`".to_string());
    };

    let transfers = &app.transfers;
    transfers.open();
    transfers.set_receiver_email(receiver_email);
    transfers.set_amount(amount);

    let balance = app.known_balance().await?;

    match transfers.submit(balance).await {
        TransferOutcome::Completed(receipt) => {
            println!("💸 Transfer Successful");
            println!("  To:     {}", receiver_email);
            println!("  Amount: ₹{}", amount);
            if let Some(id) = receipt.transaction_id {
                println!("  Ref:    {}", id);
            }
            if let Some(new_balance) = receipt.new_balance {
                println!("  Balance now ₹{:.2}", new_balance);
            }
            Ok(())
        }
        TransferOutcome::Rejected(message) | TransferOutcome::Failed(message) => Err(message),
        TransferOutcome::Ignored => {
            println!("⏳ A transfer is already being processed.");
            Ok(())
        }
    }
}
