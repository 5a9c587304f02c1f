diesel::table! {
    product (id) {
        id -> Nullable<BigInt>,
        name -> Text,
        price -> Double,
        date -> Date,
    }
}
