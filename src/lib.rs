pub mod config;
pub mod domain {
    pub mod donation;
    pub mod loyalty;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod callbacks;
        pub mod campaigns;
        pub mod checkout;
        pub mod donations;
        pub mod loyalty;
        pub mod ops;
    }
}
pub mod repo {
    pub mod campaigns_repo;
    pub mod donations_repo;
    pub mod donors_repo;
    pub mod outbox_repo;
}
pub mod service {
    pub mod checkout;
    pub mod outbox_relay;
    pub mod settlement;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub checkout_service: service::checkout::CheckoutService,
    pub settlement_service: service::settlement::SettlementService,
    pub donations_repo: repo::donations_repo::DonationsRepo,
    pub campaigns_repo: repo::campaigns_repo::CampaignsRepo,
    pub donors_repo: repo::donors_repo::DonorsRepo,
    pub bkash: Arc<gateways::bkash::BkashGateway>,
    pub sslcommerz: Arc<gateways::sslcommerz::SslCommerzGateway>,
    pub shurjopay: Arc<gateways::shurjopay::ShurjopayGateway>,
    pub redis_client: redis::Client,
    pub frontend_base_url: String,
}
