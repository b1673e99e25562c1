mod dataset;
mod series;
mod user_info;
mod view;

pub use {
    dataset::Dataset,
    series::RawSeries,
    user_info::{Expiry, LicenseStatus, UserInfo},
    view::{Metric, RangeFilter, SortDirection, SortKey},
};
