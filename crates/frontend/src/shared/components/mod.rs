pub mod metric_card;
