use teloxide::utils::html;

use crate::bsc::{format_amount, shorten_address};
use crate::entity::TransferEvent;

pub const BSCSCAN_TX_URL: &str = "https://bscscan.com/tx/";

// Alert text (HTML) for a newly detected transfer of a watched wallet
pub fn format_transfer_alert(wallet_name: &str, wallet_address: &str, event: &TransferEvent) -> String {
    let direction = event.direction(wallet_address);
    let wallet_label = if wallet_name.eq_ignore_ascii_case(wallet_address) {
        shorten_address(wallet_address)
    } else {
        html::escape(wallet_name)
    };
    let contract = html::escape(&event.token_contract_address);

    format!(
        "🚨 <b>New {} Transaction Detected!</b>\n\
         • Wallet: <b>{}</b>\n\
         • Token: {}\n\
         • Contract: <code>{}</code>\n\
         • Amount: {}\n\
         • <a href=\"{}{}\">View Transaction</a>\n\
         • <a href=\"https://t.me/maestro?start=buy_{}\">Buy on Maestro</a> | \
         <a href=\"https://t.me/ttfbotbot?start=scan_{}\">Scan</a>",
        direction.label(),
        wallet_label,
        html::escape(&event.token_symbol),
        contract,
        format_amount(event.normalized_amount(), 2),
        BSCSCAN_TX_URL,
        html::escape(&event.tx_hash),
        contract,
        contract,
    )
}
