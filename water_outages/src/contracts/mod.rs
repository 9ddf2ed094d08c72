pub mod fetch_outages;
