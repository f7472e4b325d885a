//! Integration tests for the order-creation payload built at checkout.

use jiff::civil::date;
use serde_json::json;
use testresult::TestResult;

use tani::prelude::*;

fn cart() -> Result<Vec<CartItem>, serde_json::Error> {
    serde_json::from_value(json!([
        { "id": 1, "quantity": 2, "pupuk": { "id": 10, "nama_pupuk": "Urea", "harga": 50000 } },
        { "id": 2, "quantity": 1, "pupuk": { "id": 11, "nama_pupuk": "ZA", "harga": 30000 } }
    ]))
}

fn details() -> ShippingDetails {
    ShippingDetails {
        recipient_name: " Budi Santoso ".into(),
        phone: "081234567890".into(),
        address: "Jl. Sawah Lebar 12, Klaten".into(),
        note: String::new(),
    }
}

#[test]
fn payload_snapshots_cart_with_backend_field_names() -> TestResult {
    let order = NewOrder::from_cart(
        Some(UserId::new(7)),
        &details(),
        &cart()?,
        date(2026, 10, 18),
    )?;

    assert_eq!(
        serde_json::to_value(&order)?,
        json!({
            "user_id": 7,
            "nama_pelanggan": "Budi Santoso",
            "nomor_whatsapp": "081234567890",
            "alamat_pengiriman": "Jl. Sawah Lebar 12, Klaten",
            "catatan": "",
            "tanggal_pesanan": "2026-10-18",
            "items": [
                { "pupuk_id": 10, "jumlah": 2, "harga_saat_pesanan": 50000 },
                { "pupuk_id": 11, "jumlah": 1, "harga_saat_pesanan": 30000 }
            ],
            "total_harga": 130000
        })
    );

    Ok(())
}

#[test]
fn anonymous_checkout_sends_null_user() -> TestResult {
    let order = NewOrder::from_cart(None, &details(), &cart()?, date(2026, 1, 2))?;

    assert_eq!(serde_json::to_value(&order)?["user_id"], json!(null));

    Ok(())
}

#[test]
fn empty_cart_is_rejected_first() {
    let blank = ShippingDetails::default();

    assert_eq!(
        NewOrder::from_cart(None, &blank, &[], date(2026, 1, 2)),
        Err(CheckoutValidationError::EmptyCart)
    );
}

#[test]
fn blank_required_field_is_rejected() -> TestResult {
    for field in [
        ShippingField::RecipientName,
        ShippingField::Phone,
        ShippingField::Address,
    ] {
        let mut form = details();
        form.set(field, "   ");

        let result = NewOrder::from_cart(None, &form, &cart()?, date(2026, 1, 2));

        assert!(
            matches!(&result, Err(CheckoutValidationError::MissingFields(fields)) if fields.as_slice() == [field]),
            "expected {field} to be reported missing, got {result:?}"
        );
    }

    Ok(())
}

#[test]
fn created_order_decodes_from_server_response() -> TestResult {
    let body: Data<Order> = serde_json::from_value(json!({
        "data": {
            "id": 31,
            "nama_pelanggan": "Budi Santoso",
            "nomor_whatsapp": "081234567890",
            "alamat_pengiriman": "Jl. Sawah Lebar 12, Klaten",
            "catatan": null,
            "tanggal_pesanan": "2026-10-18",
            "status": "menunggu_pembayaran",
            "items": [{ "pupuk_id": 10, "jumlah": 2, "harga_saat_pesanan": "50000.00" }],
            "total_harga": "100000.00"
        }
    }))?;

    assert_eq!(body.data.id, OrderId::new(31));
    assert_eq!(body.data.total.to_string(), "Rp100.000");
    assert_eq!(body.data.items.len(), 1);

    Ok(())
}
