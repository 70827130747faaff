use std::sync::{Arc, Mutex};

use crate::broker::{Consumer, Message, listener_fn};
use crate::connection::Credentials;
use crate::directory::BrokerDirectory;
use crate::utils::logging;

#[test]
fn news_topic_fans_out_to_both_listeners() {
    logging::init("debug");

    let directory = BrokerDirectory::new();
    let conn = directory
        .connect("vm://localhost", &Credentials::new("admin", "password"))
        .unwrap();
    let broker = directory.broker(&conn).unwrap();
    let news = broker.create_topic("news");

    let l1: Arc<Mutex<Vec<Arc<Message>>>> = Arc::default();
    let l2: Arc<Mutex<Vec<Arc<Message>>>> = Arc::default();
    let c1 = {
        let l1 = Arc::clone(&l1);
        Consumer::push(listener_fn(move |m| {
            l1.lock().unwrap().push(Arc::clone(m));
            Ok(())
        }))
    };
    let c2 = {
        let l2 = Arc::clone(&l2);
        Consumer::push(listener_fn(move |m| {
            l2.lock().unwrap().push(Arc::clone(m));
            Ok(())
        }))
    };
    broker.register_consumer(&news, Arc::clone(&c1)).unwrap();
    broker.register_consumer(&news, Arc::clone(&c2)).unwrap();

    let m = Message::new("breaking");
    let message_id = m.message_id.clone();
    assert_eq!(broker.send(&(&news).into(), m).unwrap(), 2);

    let seen1 = l1.lock().unwrap();
    let seen2 = l2.lock().unwrap();
    assert_eq!(seen1.len(), 1);
    assert_eq!(seen2.len(), 1);
    assert_eq!(seen1[0].message_id, message_id);
    // one message instance shared by every listener and delivery
    assert!(Arc::ptr_eq(&seen1[0], &seen2[0]));

    for consumer in [&c1, &c2] {
        let log = broker.deliveries(consumer.id());
        assert_eq!(log.len(), 1);
        assert!(!log[0].is_acknowledged());
        assert!(Arc::ptr_eq(log[0].message(), &seen1[0]));
    }

    directory.close(&conn).unwrap();
}

#[test]
fn second_connection_sees_destinations_of_first() {
    let directory = BrokerDirectory::new();
    let producer = directory.connect("vm://shared", &Credentials::anonymous()).unwrap();
    let consumer = directory.connect("vm://shared", &Credentials::anonymous()).unwrap();

    let consumer_broker = directory.broker(&consumer).unwrap();
    let topic = consumer_broker.create_topic("Orders");
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    consumer_broker
        .register_consumer(
            &topic,
            Consumer::push(listener_fn(move |m| {
                sink.lock().unwrap().push(m.body::<&str>().unwrap().to_string());
                Ok(())
            })),
        )
        .unwrap();

    let producer_broker = directory.broker(&producer).unwrap();
    let same_topic = producer_broker.create_topic("orders");
    producer_broker
        .send(&(&same_topic).into(), Message::new("order-1"))
        .unwrap();

    assert_eq!(*received.lock().unwrap(), vec!["order-1".to_string()]);
}

#[test]
fn removing_broker_invalidates_open_connections() {
    let directory = BrokerDirectory::new();
    let conn = directory.connect("vm://temp", &Credentials::anonymous()).unwrap();
    directory.remove("temp");

    let fresh = directory.connect("vm://temp", &Credentials::anonymous()).unwrap();
    assert_ne!(fresh.broker_id, conn.broker_id);

    assert!(directory.close(&conn).is_err());
    assert!(directory.broker(&conn).is_err());
    directory.close(&fresh).unwrap();
}
