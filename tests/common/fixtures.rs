/// Two orders with items, nested markup and a namespaced shipping block.
pub const ORDERS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<orders xmlns:ship="urn:shipping">
  <order id="o1" status="open">
    <customer tier="gold">Alice</customer>
    <item sku="A1" qty="2" price="9.50">Pen</item>
    <item sku="B2" qty="10" price="120">Lamp</item>
    <note>fragile</note>
    <item sku="C3" qty="1">Mug</item>
    <ship:address ship:zone="eu">Oslo</ship:address>
  </order>
  <order id="o2" status="closed">
    <customer tier="silver">Bob</customer>
    <item sku="A1" qty="7" price="9.50">Pen</item>
    <note>gift <b>wrap</b> please</note>
  </order>
</orders>"#;

/// A document in a default namespace.
pub const CATALOG: &str = r#"<catalog xmlns="urn:catalog" xmlns:x="urn:extra">
  <book id="b1" x:rating="5"><title>Rust</title></book>
  <book id="b2"><title>XML &amp; You</title></book>
  <x:book id="b3"/>
</catalog>"#;

pub fn many_orders(count: usize) -> String {
    let mut xml = String::from("<orders>");
    for i in 0..count {
        let status = if i % 3 == 0 { "closed" } else { "open" };
        xml.push_str(&format!(
            r#"<order id="o{i}" status="{status}"><item sku="S{i}" qty="{}">Item {i}</item><note>n{i}</note></order>"#,
            i % 12
        ));
    }
    xml.push_str("</orders>");
    xml
}
