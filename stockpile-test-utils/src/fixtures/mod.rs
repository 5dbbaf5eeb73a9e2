pub mod eve;
