pub mod put_hedge;
