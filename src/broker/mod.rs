pub mod consumer;
pub mod delivery;
pub mod destination;
pub mod engine;
pub mod message;

pub use consumer::{Consumer, ConsumerId, ConsumerMode, MessageListener, listener_fn};
pub use delivery::{Delivery, DeliveryRetention};
pub use destination::{Destination, Queue, Topic};
pub use engine::{Broker, BrokerId};
pub use message::Message;
