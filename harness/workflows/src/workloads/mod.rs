pub mod batch_transfer;
