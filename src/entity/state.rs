#[derive(Clone, Default, Debug)]
pub enum State {
    #[default]
    Start,
    AwaitingWalletName {
        wallet_address: String,
    },
}
