mod helpers;
mod mocks;
mod topups;
mod wallets;
