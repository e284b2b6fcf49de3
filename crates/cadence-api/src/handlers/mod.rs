pub mod strategy_chat;
